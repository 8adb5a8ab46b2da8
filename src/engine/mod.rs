//! Fee and savings calculation.
//!
//! The same formulas are applied to the incumbent schedule and to the
//! reference schedule, producing two independent breakdowns for one profile:
//!
//! ```text
//! payment_fees    = mrr * base_fee_rate
//! fx_fees         = mrr * (international_percent / 100) * fx_markup_rate
//! failed_payments = mrr * (failed_payment_rate / 100)   * failed_payment_recovery_rate
//! tax_overhead    = mrr * (eu_percent / 100)             * tax_overhead_rate
//! chargebacks     = mrr * chargeback_rate
//! ```
//!
//! Everything here is pure: no I/O, no shared mutable state.

use std::sync::Arc;

use tracing::trace;

use crate::domain::{BusinessProfile, Comparison, CostBreakdown, FeeSchedule, SavingsSummary};
use crate::error::CalcError;
use crate::normalize::{RawProfile, normalize};
use crate::registry::FeeScheduleRegistry;

/// Cost of one schedule for one profile.
pub fn cost_breakdown(profile: &BusinessProfile, schedule: &FeeSchedule) -> CostBreakdown {
    let mrr = profile.mrr();
    CostBreakdown::new(
        mrr * schedule.base_fee_rate,
        mrr * (profile.international_percent() / 100.0) * schedule.fx_markup_rate,
        mrr * (profile.failed_payment_rate() / 100.0) * schedule.failed_payment_recovery_rate,
        mrr * (profile.eu_percent() / 100.0) * schedule.tax_overhead_rate,
        mrr * schedule.chargeback_rate,
    )
}

/// Compare an incumbent schedule against the reference schedule.
pub fn compare(profile: &BusinessProfile, incumbent: &FeeSchedule, reference: &FeeSchedule) -> Comparison {
    let current = cost_breakdown(profile, incumbent);
    let paaaid = cost_breakdown(profile, reference);
    let savings = SavingsSummary::between(&current, &paaaid);
    Comparison {
        current,
        paaaid,
        savings,
    }
}

/// Calculator bound to a validated registry.
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Calculator {
    registry: Arc<FeeScheduleRegistry>,
}

impl Calculator {
    pub fn new(registry: Arc<FeeScheduleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FeeScheduleRegistry {
        &self.registry
    }

    pub fn calculate(&self, profile: &BusinessProfile) -> Comparison {
        let incumbent = self.registry.schedule(profile.processor());
        let result = compare(profile, incumbent, self.registry.reference());
        trace!(
            processor = %profile.processor(),
            mrr = profile.mrr(),
            current = result.current.total(),
            paaaid = result.paaaid.total(),
            "calculated comparison"
        );
        result
    }

    /// Normalize then calculate. `Ok(None)` when the input carries no usable MRR.
    pub fn calculate_raw(&self, raw: &RawProfile) -> Result<Option<Comparison>, CalcError> {
        Ok(normalize(raw)?.map(|profile| self.calculate(&profile)))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::domain::{CostCategory, ProcessorId, Provider};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stripe() -> FeeSchedule {
        FeeSchedule {
            provider: Provider::Incumbent(ProcessorId::Stripe),
            base_fee_rate: 0.029,
            fx_markup_rate: 0.02,
            chargeback_rate: 0.006,
            tax_overhead_rate: 0.015,
            failed_payment_recovery_rate: 0.04,
        }
    }

    fn reference() -> FeeSchedule {
        FeeSchedule {
            provider: Provider::Reference,
            base_fee_rate: 0.015,
            fx_markup_rate: 0.005,
            chargeback_rate: 0.002,
            tax_overhead_rate: 0.005,
            failed_payment_recovery_rate: 0.01,
        }
    }

    fn calculator() -> Calculator {
        Calculator::new(Arc::new(FeeScheduleRegistry::builtin().unwrap()))
    }

    #[test]
    fn formulas_apply_per_category() {
        let profile = BusinessProfile::new(10_000.0, ProcessorId::Stripe, 30.0, 20.0, 5.0).unwrap();
        let r = compare(&profile, &stripe(), &reference());

        assert!(close(r.current.payment_fees(), 290.0));
        assert!(close(r.current.fx_fees(), 60.0));
        assert!(close(r.current.failed_payments(), 20.0));
        assert!(close(r.current.tax_overhead(), 30.0));
        assert!(close(r.current.chargebacks(), 60.0));
        assert!(close(r.current.total(), 460.0));

        assert!(close(r.paaaid.payment_fees(), 150.0));
        assert!(close(r.paaaid.fx_fees(), 15.0));
        assert!(close(r.paaaid.failed_payments(), 5.0));
        assert!(close(r.paaaid.tax_overhead(), 10.0));
        assert!(close(r.paaaid.chargebacks(), 20.0));
        assert!(close(r.paaaid.total(), 200.0));

        assert!(close(r.savings.total, 260.0));
        assert!((r.savings.percentage - 56.52).abs() < 0.01);
        assert!(close(r.savings.annual, 3120.0));
    }

    #[test]
    fn shipped_table_reproduces_worked_example() {
        let profile = BusinessProfile::new(10_000.0, ProcessorId::Stripe, 30.0, 20.0, 5.0).unwrap();
        let r = calculator().calculate(&profile);

        assert!(close(r.current.payment_fees(), 290.0));
        assert!(close(r.current.fx_fees(), 60.0));
        assert!(close(r.current.failed_payments(), 20.0));
        assert!(close(r.current.tax_overhead(), 30.0));
        assert!(close(r.current.chargebacks(), 60.0));
        assert!(close(r.current.total(), 460.0));

        assert!(close(r.paaaid.payment_fees(), 150.0));
        assert!(close(r.paaaid.fx_fees(), 1.5));
        assert!(close(r.paaaid.failed_payments(), 5.0));
        assert!(close(r.paaaid.tax_overhead(), 1.0));
        assert!(close(r.paaaid.chargebacks(), 20.0));
        assert!(close(r.paaaid.total(), 177.5));

        assert!(close(r.savings.total, 282.5));
        assert!((r.savings.percentage - 61.4).abs() < 0.05);
        assert!(close(r.savings.annual, 3390.0));
    }

    #[test]
    fn builtin_stripe_matches_illustrative_schedule() {
        let reg = FeeScheduleRegistry::builtin().unwrap();
        assert_eq!(reg.schedule(ProcessorId::Stripe), &stripe());
    }

    #[test]
    fn zero_shares_zero_their_categories() {
        let profile = BusinessProfile::new(5_000.0, ProcessorId::Paypal, 0.0, 0.0, 0.0).unwrap();
        let r = calculator().calculate(&profile);
        for b in [&r.current, &r.paaaid] {
            assert_eq!(b.fx_fees(), 0.0);
            assert_eq!(b.tax_overhead(), 0.0);
            assert_eq!(b.failed_payments(), 0.0);
            assert!(b.payment_fees() > 0.0);
        }
    }

    #[test]
    fn zero_cost_schedules_give_zero_percentage() {
        let mut free = reference();
        free.base_fee_rate = 0.0;
        free.fx_markup_rate = 0.0;
        free.chargeback_rate = 0.0;
        free.tax_overhead_rate = 0.0;
        free.failed_payment_recovery_rate = 0.0;
        let profile = BusinessProfile::new(1_000.0, ProcessorId::Lemon, 50.0, 50.0, 10.0).unwrap();
        let r = compare(&profile, &free, &free);
        assert_eq!(r.current.total(), 0.0);
        assert_eq!(r.savings.percentage, 0.0);
    }

    #[test]
    fn repeated_calculation_is_byte_identical() {
        let calc = calculator();
        let profile = BusinessProfile::new(12_345.67, ProcessorId::Paddle, 12.5, 33.3, 7.1).unwrap();
        let a = serde_json::to_string(&calc.calculate(&profile)).unwrap();
        let b = serde_json::to_string(&calc.calculate(&profile)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invariants_hold_for_random_profiles() {
        let calc = calculator();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2_000 {
            let processor = ProcessorId::ALL[rng.gen_range(0..ProcessorId::ALL.len())];
            let profile = BusinessProfile::new(
                rng.gen_range(0.01..5_000_000.0),
                processor,
                rng.gen_range(0.0..=100.0),
                rng.gen_range(0.0..=100.0),
                rng.gen_range(0.0..=100.0),
            )
            .unwrap();
            let r = calc.calculate(&profile);

            for b in [&r.current, &r.paaaid] {
                let sum = b.payment_fees() + b.fx_fees() + b.failed_payments() + b.tax_overhead() + b.chargebacks();
                assert_eq!(b.total(), sum);
                for c in CostCategory::ALL {
                    assert!(b.amount(c) >= 0.0);
                }
            }

            assert_eq!(r.savings.total, r.current.total() - r.paaaid.total());
            assert!(r.savings.total >= 0.0);
            assert_eq!(r.savings.annual, r.savings.total * 12.0);
            let expected_pct = r.savings.total / r.current.total() * 100.0;
            assert!((r.savings.percentage - expected_pct).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&r.savings.percentage));
        }
    }

    #[test]
    fn calculate_raw_propagates_errors_and_no_profile() {
        let calc = calculator();
        let unknown = RawProfile::from_parts(100.0, "amazon_pay", 0.0, 0.0, 0.0);
        assert!(matches!(calc.calculate_raw(&unknown), Err(CalcError::UnknownProcessor(_))));

        let empty = RawProfile::from_parts(0.0, "stripe", 0.0, 0.0, 0.0);
        assert_eq!(calc.calculate_raw(&empty).unwrap(), None);

        let ok = RawProfile::from_parts(100.0, "stripe", 0.0, 0.0, 0.0);
        assert!(calc.calculate_raw(&ok).unwrap().is_some());
    }

    #[test]
    fn concurrent_calculations_agree_with_sequential() {
        let calc = calculator();
        let profiles: Vec<BusinessProfile> = (1..=64)
            .map(|i| {
                let p = ProcessorId::ALL[i % 4];
                BusinessProfile::new(i as f64 * 250.0, p, (i % 100) as f64, 20.0, 3.0).unwrap()
            })
            .collect();
        let sequential: Vec<Comparison> = profiles.iter().map(|p| calc.calculate(p)).collect();

        let parallel: Vec<Comparison> = std::thread::scope(|s| {
            let handles: Vec<_> = profiles
                .iter()
                .map(|p| {
                    let calc = calc.clone();
                    s.spawn(move || calc.calculate(p))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, parallel);
    }
}
