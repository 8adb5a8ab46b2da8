//! Savings sweep across an MRR range.
//!
//! Runs one calculation per `(processor, mrr)` grid point. Points are
//! independent and the registry is read-only, so they are evaluated in
//! parallel; output order is always processor-major, then ascending MRR.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::domain::{BusinessProfile, ProcessorId};
use crate::engine::Calculator;
use crate::error::AppError;

pub mod export;
pub mod grid;

pub use export::write_sweep_csv;
pub use grid::{MAX_SWEEP_STEPS, log_space};

/// What to sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSpec {
    pub processors: Vec<ProcessorId>,
    pub mrr_min: f64,
    pub mrr_max: f64,
    pub steps: usize,
    pub international_percent: f64,
    pub eu_percent: f64,
    pub failed_payment_rate: f64,
}

/// One grid point's headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub processor: ProcessorId,
    pub mrr: f64,
    pub current_total: f64,
    pub paaaid_total: f64,
    pub savings_total: f64,
    pub savings_percentage: f64,
    pub savings_annual: f64,
}

pub fn run_sweep(calculator: &Calculator, spec: &SweepSpec) -> Result<Vec<SweepRow>, AppError> {
    let mrrs = log_space(spec.mrr_min, spec.mrr_max, spec.steps)?;
    let processors = if spec.processors.is_empty() {
        ProcessorId::ALL.to_vec()
    } else {
        spec.processors.clone()
    };

    let mut profiles = Vec::with_capacity(processors.len() * mrrs.len());
    for &processor in &processors {
        for &mrr in &mrrs {
            profiles.push(BusinessProfile::new(
                mrr,
                processor,
                spec.international_percent,
                spec.eu_percent,
                spec.failed_payment_rate,
            )?);
        }
    }

    let rows: Vec<SweepRow> = profiles
        .par_iter()
        .map(|profile| {
            let c = calculator.calculate(profile);
            SweepRow {
                processor: profile.processor(),
                mrr: profile.mrr(),
                current_total: c.current.total(),
                paaaid_total: c.paaaid.total(),
                savings_total: c.savings.total,
                savings_percentage: c.savings.percentage,
                savings_annual: c.savings.annual,
            }
        })
        .collect();

    info!(points = rows.len(), processors = processors.len(), "sweep complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::FeeScheduleRegistry;

    fn calculator() -> Calculator {
        Calculator::new(Arc::new(FeeScheduleRegistry::builtin().unwrap()))
    }

    fn spec(processors: Vec<ProcessorId>) -> SweepSpec {
        SweepSpec {
            processors,
            mrr_min: 1_000.0,
            mrr_max: 100_000.0,
            steps: 5,
            international_percent: 30.0,
            eu_percent: 20.0,
            failed_payment_rate: 5.0,
        }
    }

    #[test]
    fn empty_processor_list_sweeps_all_in_order() {
        let rows = run_sweep(&calculator(), &spec(vec![])).unwrap();
        assert_eq!(rows.len(), 4 * 5);
        for (chunk, p) in rows.chunks(5).zip(ProcessorId::ALL) {
            assert!(chunk.iter().all(|r| r.processor == p));
            assert!(chunk.windows(2).all(|w| w[0].mrr < w[1].mrr));
        }
    }

    #[test]
    fn rows_match_single_calculations() {
        let calc = calculator();
        let rows = run_sweep(&calc, &spec(vec![ProcessorId::Paypal])).unwrap();
        for row in rows {
            let profile = BusinessProfile::new(row.mrr, ProcessorId::Paypal, 30.0, 20.0, 5.0).unwrap();
            let c = calc.calculate(&profile);
            assert_eq!(row.current_total, c.current.total());
            assert_eq!(row.paaaid_total, c.paaaid.total());
            assert_eq!(row.savings_total, c.savings.total);
            assert!(row.savings_total >= 0.0);
        }
    }

    #[test]
    fn savings_scale_linearly_with_mrr() {
        let rows = run_sweep(&calculator(), &spec(vec![ProcessorId::Stripe])).unwrap();
        let first = &rows[0];
        let last = &rows[rows.len() - 1];
        let ratio = last.savings_total / first.savings_total;
        assert!((ratio - 100.0).abs() < 1e-6);
        assert!((first.savings_percentage - last.savings_percentage).abs() < 1e-9);
    }

    #[test]
    fn invalid_range_is_rejected() {
        let mut s = spec(vec![]);
        s.mrr_min = -1.0;
        assert!(run_sweep(&calculator(), &s).is_err());
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocating() {
        let mut s = spec(vec![]);
        s.steps = 100_000_000_000;
        assert!(run_sweep(&calculator(), &s).is_err());
    }
}
