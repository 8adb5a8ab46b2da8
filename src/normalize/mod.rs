//! Raw input -> validated `BusinessProfile`.
//!
//! Callers send loosely-typed JSON: numbers may arrive as numbers, numeric
//! strings, `null`, or not at all. Rules:
//!
//! - `mrr` missing, empty, non-finite or `<= 0` means "no profile" (`Ok(None)`);
//!   the engine is not invoked for such requests
//! - percentages default to 0 when missing and are clamped into `[0, 100]`
//! - the processor is resolved eagerly against the closed `ProcessorId` set
//! - anything that is not a number where a number is expected is `InvalidProfile`

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::types::clamp_percent;
use crate::domain::{BusinessProfile, ProcessorId};
use crate::error::CalcError;

/// Request body as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub mrr: Option<Value>,
    #[serde(alias = "processor_id")]
    pub processor: Option<Value>,
    pub international_percent: Option<Value>,
    pub eu_percent: Option<Value>,
    pub failed_payment_rate: Option<Value>,
}

impl RawProfile {
    /// Build a raw profile from already-typed values (CLI input).
    ///
    /// Non-finite values are kept as their string form so they reach the same
    /// clamping and rejection rules as JSON input.
    pub fn from_parts(
        mrr: f64,
        processor: &str,
        international_percent: f64,
        eu_percent: f64,
        failed_payment_rate: f64,
    ) -> Self {
        Self {
            mrr: Some(number(mrr)),
            processor: Some(Value::from(processor)),
            international_percent: Some(number(international_percent)),
            eu_percent: Some(number(eu_percent)),
            failed_payment_rate: Some(number(failed_payment_rate)),
        }
    }
}

// `Value::from(f64)` maps NaN and the infinities to `null`.
fn number(v: f64) -> Value {
    if v.is_finite() {
        Value::from(v)
    } else {
        Value::String(v.to_string())
    }
}

/// Validate and clamp a raw profile.
pub fn normalize(raw: &RawProfile) -> Result<Option<BusinessProfile>, CalcError> {
    let Some(mrr) = numeric("mrr", raw.mrr.as_ref())? else {
        debug!("request has no mrr; skipping calculation");
        return Ok(None);
    };
    if !(mrr.is_finite() && mrr > 0.0) {
        debug!(mrr, "non-positive mrr; skipping calculation");
        return Ok(None);
    }

    let processor = resolve_processor(raw.processor.as_ref())?;

    let international = percent("international_percent", raw.international_percent.as_ref())?;
    let eu = percent("eu_percent", raw.eu_percent.as_ref())?;
    let failed = percent("failed_payment_rate", raw.failed_payment_rate.as_ref())?;

    BusinessProfile::new(mrr, processor, international, eu, failed).map(Some)
}

fn resolve_processor(value: Option<&Value>) -> Result<ProcessorId, CalcError> {
    match value {
        Some(Value::String(s)) => s.parse(),
        None | Some(Value::Null) => Err(CalcError::UnknownProcessor(String::new())),
        Some(other) => Err(CalcError::UnknownProcessor(other.to_string())),
    }
}

fn percent(field: &'static str, value: Option<&Value>) -> Result<f64, CalcError> {
    let Some(v) = numeric(field, value)? else {
        return Ok(0.0);
    };
    let clamped = clamp_percent(field, v)?;
    if clamped != v {
        debug!(field, value = v, clamped, "percentage clamped");
    }
    Ok(clamped)
}

/// Interpret a JSON value as a number. `None` means "absent".
fn numeric(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, CalcError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| CalcError::invalid(field, format!("unrepresentable number {n}"))),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| CalcError::invalid(field, format!("expected a number, got '{s}'")))
        }
        Some(other) => Err(CalcError::invalid(field, format!("expected a number, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(v: Value) -> RawProfile {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn normalizes_well_formed_input() {
        let p = normalize(&raw(json!({
            "mrr": 10000,
            "processor": "stripe",
            "international_percent": 30,
            "eu_percent": 20,
            "failed_payment_rate": 5
        })))
        .unwrap()
        .unwrap();
        assert_eq!(p.mrr(), 10000.0);
        assert_eq!(p.processor(), ProcessorId::Stripe);
        assert_eq!(p.international_percent(), 30.0);
        assert_eq!(p.eu_percent(), 20.0);
        assert_eq!(p.failed_payment_rate(), 5.0);
    }

    #[test]
    fn accepts_numeric_strings_and_defaults_missing_percentages() {
        let p = normalize(&raw(json!({ "mrr": " 2500.5 ", "processor": "PayPal" })))
            .unwrap()
            .unwrap();
        assert_eq!(p.mrr(), 2500.5);
        assert_eq!(p.processor(), ProcessorId::Paypal);
        assert_eq!(p.international_percent(), 0.0);
        assert_eq!(p.eu_percent(), 0.0);
        assert_eq!(p.failed_payment_rate(), 0.0);
    }

    #[test]
    fn clamps_out_of_range_percentages() {
        let p = normalize(&raw(json!({
            "mrr": 100,
            "processor": "lemon",
            "international_percent": -10,
            "eu_percent": 140,
            "failed_payment_rate": 55
        })))
        .unwrap()
        .unwrap();
        assert_eq!(p.international_percent(), 0.0);
        assert_eq!(p.eu_percent(), 100.0);
        // Above the UI's slider range but inside [0, 100]: kept as-is.
        assert_eq!(p.failed_payment_rate(), 55.0);
    }

    #[test]
    fn non_positive_or_missing_mrr_is_no_profile() {
        for body in [
            json!({ "processor": "stripe" }),
            json!({ "mrr": null, "processor": "stripe" }),
            json!({ "mrr": 0, "processor": "stripe" }),
            json!({ "mrr": -5, "processor": "stripe" }),
            json!({ "mrr": "", "processor": "stripe" }),
            json!({ "mrr": "inf", "processor": "stripe" }),
        ] {
            assert_eq!(normalize(&raw(body.clone())).unwrap(), None, "{body}");
        }
    }

    #[test]
    fn unknown_or_missing_processor_is_rejected() {
        let err = normalize(&raw(json!({ "mrr": 100, "processor": "amazon_pay" }))).unwrap_err();
        assert_eq!(err, CalcError::UnknownProcessor("amazon_pay".to_string()));

        let err = normalize(&raw(json!({ "mrr": 100 }))).unwrap_err();
        assert_eq!(err.code(), "unknown_processor");

        let err = normalize(&raw(json!({ "mrr": 100, "processor": 7 }))).unwrap_err();
        assert_eq!(err.code(), "unknown_processor");
    }

    #[test]
    fn non_numeric_fields_are_invalid() {
        let err = normalize(&raw(json!({ "mrr": "lots", "processor": "stripe" }))).unwrap_err();
        assert!(matches!(err, CalcError::InvalidProfile { field: "mrr", .. }));

        let err = normalize(&raw(json!({ "mrr": 1, "processor": "stripe", "eu_percent": [1] }))).unwrap_err();
        assert!(matches!(err, CalcError::InvalidProfile { field: "eu_percent", .. }));

        let err = normalize(&raw(json!({
            "mrr": 1, "processor": "stripe", "international_percent": "NaN"
        })))
        .unwrap_err();
        assert!(matches!(err, CalcError::InvalidProfile { field: "international_percent", .. }));
    }

    #[test]
    fn from_parts_matches_json_input() {
        let a = normalize(&RawProfile::from_parts(500.0, "paddle", 10.0, 20.0, 3.0)).unwrap();
        let b = normalize(&raw(json!({
            "mrr": 500.0,
            "processor": "paddle",
            "international_percent": 10.0,
            "eu_percent": 20.0,
            "failed_payment_rate": 3.0
        })))
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_parts_keeps_non_finite_percentages() {
        let p = normalize(&RawProfile::from_parts(100.0, "stripe", f64::INFINITY, f64::NEG_INFINITY, 5.0))
            .unwrap()
            .unwrap();
        assert_eq!(p.international_percent(), 100.0);
        assert_eq!(p.eu_percent(), 0.0);
        assert_eq!(p.failed_payment_rate(), 5.0);

        let err = normalize(&RawProfile::from_parts(100.0, "stripe", 0.0, 0.0, f64::NAN)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidProfile { field: "failed_payment_rate", .. }));

        assert_eq!(normalize(&RawProfile::from_parts(f64::INFINITY, "stripe", 0.0, 0.0, 0.0)).unwrap(), None);
    }

    #[test]
    fn from_parts_agrees_with_profile_constructor() {
        let via_raw = normalize(&RawProfile::from_parts(800.0, "paypal", f64::INFINITY, 250.0, -3.0))
            .unwrap()
            .unwrap();
        let direct = BusinessProfile::new(800.0, ProcessorId::Paypal, f64::INFINITY, 250.0, -3.0).unwrap();
        assert_eq!(via_raw, direct);
    }
}
