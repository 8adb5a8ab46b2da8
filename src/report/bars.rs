//! ASCII bar chart for terminal output.
//!
//! Fixed-width and deterministic, so it is easy to eyeball and to assert on.
//!
//! Bar elements:
//! - incumbent: `#`
//! - reference: `=`

use crate::domain::{Comparison, CostCategory};
use crate::report::money;

const LABEL_WIDTH: usize = 18;

/// Render one pair of bars per cost category, scaled to the largest amount.
pub fn render_bars(result: &Comparison, width: usize) -> String {
    let width = width.max(10);
    let max = CostCategory::ALL
        .iter()
        .flat_map(|&c| [result.current.amount(c), result.paaaid.amount(c)])
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for category in CostCategory::ALL {
        let current = result.current.amount(category);
        let paaaid = result.paaaid.amount(category);
        out.push_str(&bar_line(category.label(), current, max, width, '#'));
        out.push_str(&bar_line("", paaaid, max, width, '='));
    }
    out.push_str(&format!("{:LABEL_WIDTH$}# current   = Paaaid\n", ""));
    out
}

fn bar_line(label: &str, value: f64, max: f64, width: usize, glyph: char) -> String {
    let len = if max > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    let bar: String = std::iter::repeat_n(glyph, len.min(width)).collect();
    format!("{label:<LABEL_WIDTH$}{bar:<width$} {}\n", money(value))
}
