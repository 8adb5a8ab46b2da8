//! MRR grid generation.
//!
//! Revenue spans orders of magnitude, so sweeps use log-spaced points.

use crate::error::{AppError, EXIT_USAGE};

/// Upper bound on grid points per processor.
pub const MAX_SWEEP_STEPS: usize = 10_000;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
///
/// `min == max` with a single step is allowed and yields one point.
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= min) {
        return Err(AppError::new(
            EXIT_USAGE,
            format!("Invalid MRR range: min={min}, max={max} (must be finite, >0, and max>=min)."),
        ));
    }
    if steps > MAX_SWEEP_STEPS {
        return Err(AppError::new(
            EXIT_USAGE,
            format!("MRR sweep supports at most {MAX_SWEEP_STEPS} steps (got {steps})."),
        ));
    }
    if steps == 1 && min == max {
        return Ok(vec![min]);
    }
    if steps < 2 || max == min {
        return Err(AppError::new(
            EXIT_USAGE,
            "MRR sweep needs at least 2 steps over a non-empty range.",
        ));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    // Pin the endpoints so exported rows show the exact requested bounds.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}
