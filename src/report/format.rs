//! Formatted terminal output.
//!
//! We keep formatting code in one place so the engine stays free of
//! presentation concerns and output changes are localized.

use crate::domain::{BusinessProfile, Comparison, CostCategory, Provider, RateField};
use crate::registry::FeeScheduleRegistry;
use crate::sweep::SweepRow;

/// Amount formatted with thousands separators and two decimals (`12,345.60`).
pub fn money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{grouped}.{frac:02}", if negative { "-" } else { "" })
}

/// Full comparison summary for one profile.
pub fn format_comparison(profile: &BusinessProfile, result: &Comparison) -> String {
    let mut out = String::new();
    let name = profile.processor().display_name();

    out.push_str("=== leak - Revenue Leakage Comparison ===\n");
    out.push_str(&format!("MRR: {}\n", money(profile.mrr())));
    out.push_str(&format!("Processor: {name}\n"));
    out.push_str(&format!(
        "International: {:.1}%  EU: {:.1}%  Failed payments: {:.1}%\n\n",
        profile.international_percent(),
        profile.eu_percent(),
        profile.failed_payment_rate()
    ));

    out.push_str(&format!("{:<18}{:>14}{:>14}\n", "Category", name, "Paaaid"));
    for category in CostCategory::ALL {
        out.push_str(&format!(
            "{:<18}{:>14}{:>14}\n",
            category.label(),
            money(result.current.amount(category)),
            money(result.paaaid.amount(category)),
        ));
    }
    out.push_str(&format!(
        "{:<18}{:>14}{:>14}\n\n",
        "Total / month",
        money(result.current.total()),
        money(result.paaaid.total()),
    ));

    let leakage_share = result.current.total() / profile.mrr() * 100.0;
    out.push_str(&format!(
        "Total leakage: {} ({leakage_share:.1}% of MRR)\n",
        money(result.current.total())
    ));
    out.push_str(&format!(
        "Net revenue with Paaaid: {}\n",
        money(profile.mrr() - result.paaaid.total())
    ));
    out.push_str(&format!(
        "Savings: {} / month ({:.1}% less), {} / year\n",
        money(result.savings.total),
        result.savings.percentage,
        money(result.savings.annual)
    ));

    out
}

/// Registry version and rate table.
pub fn format_schedules(registry: &FeeScheduleRegistry) -> String {
    let version = registry.version();
    let mut out = String::new();
    out.push_str(&format!(
        "Schedule table: {} (effective {})\n",
        version.label, version.effective
    ));

    out.push_str(&format!("{:<16}", "Provider"));
    for field in RateField::ALL {
        out.push_str(&format!("{:>12}", short_label(field)));
    }
    out.push('\n');

    for schedule in registry.schedules() {
        let mut label = schedule.provider.display_name().to_string();
        if schedule.provider == Provider::Reference {
            label.push_str(" *");
        }
        out.push_str(&format!("{label:<16}"));
        for field in RateField::ALL {
            out.push_str(&format!("{:>11.2}%", schedule.rate(field) * 100.0));
        }
        out.push('\n');
    }
    out.push_str("* reference provider\n");
    out
}

fn short_label(field: RateField) -> &'static str {
    match field {
        RateField::BaseFee => "base",
        RateField::FxMarkup => "fx",
        RateField::Chargeback => "chargeback",
        RateField::TaxOverhead => "tax",
        RateField::FailedPaymentRecovery => "failed",
    }
}

/// Sweep rows as a table.
pub fn format_sweep(rows: &[SweepRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14}{:>16}{:>14}{:>14}{:>14}{:>9}{:>16}\n",
        "Processor", "MRR", "Current", "Paaaid", "Savings", "%", "Annual"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<14}{:>16}{:>14}{:>14}{:>14}{:>8.1}%{:>16}\n",
            r.processor.display_name(),
            money(r.mrr),
            money(r.current_total),
            money(r.paaaid_total),
            money(r.savings_total),
            r.savings_percentage,
            money(r.savings_annual),
        ));
    }
    out
}
