//! The schedule table shipped with the binary.
//!
//! Stripe and Paaaid rates reproduce the worked example used in the tests
//! (10k MRR on Stripe: 460 vs 177.5 per month). The remaining incumbents are
//! illustrative and only need to respect the reference-is-cheapest ordering;
//! confirm against published pricing before quoting numbers to a customer.

use chrono::NaiveDate;

use crate::domain::{FeeSchedule, ProcessorId, Provider, RegistryVersion};
use crate::registry::ScheduleTable;

pub const BUILTIN_LABEL: &str = "illustrative-2025.1";

fn schedule(provider: Provider, rates: [f64; 5]) -> FeeSchedule {
    let [base, fx, chargeback, tax, failed] = rates;
    FeeSchedule {
        provider,
        base_fee_rate: base,
        fx_markup_rate: fx,
        chargeback_rate: chargeback,
        tax_overhead_rate: tax,
        failed_payment_recovery_rate: failed,
    }
}

/// Build the shipped table.
///
/// Rate order: base fee, FX markup, chargeback, tax overhead, failed-payment recovery.
pub fn builtin_table() -> ScheduleTable {
    let effective = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    ScheduleTable {
        version: RegistryVersion {
            label: BUILTIN_LABEL.to_string(),
            effective,
        },
        schedules: vec![
            schedule(Provider::Incumbent(ProcessorId::Stripe), [0.029, 0.02, 0.006, 0.015, 0.04]),
            schedule(Provider::Incumbent(ProcessorId::Paypal), [0.0349, 0.03, 0.008, 0.015, 0.045]),
            // Merchant-of-record platforms: higher base fee, tax handling mostly included.
            schedule(Provider::Incumbent(ProcessorId::Paddle), [0.05, 0.015, 0.004, 0.005, 0.03]),
            schedule(Provider::Incumbent(ProcessorId::Lemon), [0.05, 0.015, 0.005, 0.006, 0.035]),
            schedule(Provider::Reference, [0.015, 0.0005, 0.002, 0.0005, 0.01]),
        ],
    }
}
