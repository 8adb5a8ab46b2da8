//! Reporting utilities: comparison tables, schedule tables, and bar charts.

pub mod bars;
pub mod format;

pub use bars::render_bars;
pub use format::{format_comparison, format_schedules, format_sweep, money};
