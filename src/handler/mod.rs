//! JSON request boundary.
//!
//! Accepts the calculator request body (`mrr`, `processor`,
//! `international_percent`, `eu_percent`, `failed_payment_rate`) and always
//! produces a response envelope. Failures never escape as errors here: they
//! become `{"success": false, "error": <code>, "message": <text>}`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Comparison, CostBreakdown, SavingsSummary};
use crate::engine::Calculator;
use crate::error::CalcError;
use crate::normalize::RawProfile;

/// Response code when the request carries no positive MRR.
pub const NO_PROFILE: &str = "no_profile";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessBody {
    pub success: bool,
    pub current: CostBreakdown,
    pub paaaid: CostBreakdown,
    pub savings: SavingsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResponse {
    Success(SuccessBody),
    Failure(FailureBody),
}

impl CalculationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, CalculationResponse::Success(_))
    }

    fn failure(error: &'static str, message: impl Into<String>) -> Self {
        CalculationResponse::Failure(FailureBody {
            success: false,
            error,
            message: message.into(),
        })
    }
}

impl From<Comparison> for CalculationResponse {
    fn from(c: Comparison) -> Self {
        CalculationResponse::Success(SuccessBody {
            success: true,
            current: c.current,
            paaaid: c.paaaid,
            savings: c.savings,
        })
    }
}

impl From<CalcError> for CalculationResponse {
    fn from(err: CalcError) -> Self {
        CalculationResponse::failure(err.code(), err.to_string())
    }
}

/// Handle a request body given as text.
pub fn handle_json(calculator: &Calculator, body: &str) -> CalculationResponse {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => handle_value(calculator, value),
        Err(e) => reject(CalcError::invalid("body", format!("malformed JSON: {e}"))),
    }
}

/// Handle an already-parsed request body.
pub fn handle_value(calculator: &Calculator, body: Value) -> CalculationResponse {
    if !body.is_object() {
        return reject(CalcError::invalid("body", "expected a JSON object"));
    }
    let raw: RawProfile = match serde_json::from_value(body) {
        Ok(raw) => raw,
        Err(e) => return reject(CalcError::invalid("body", e.to_string())),
    };

    match calculator.calculate_raw(&raw) {
        Ok(Some(comparison)) => {
            debug!(
                current = comparison.current.total(),
                paaaid = comparison.paaaid.total(),
                savings = comparison.savings.total,
                "request served"
            );
            comparison.into()
        }
        Ok(None) => {
            debug!("request without positive mrr");
            CalculationResponse::failure(NO_PROFILE, "mrr must be a number greater than zero")
        }
        Err(err) => reject(err),
    }
}

fn reject(err: CalcError) -> CalculationResponse {
    warn!(code = err.code(), error = %err, "request rejected");
    err.into()
}
