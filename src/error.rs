//! Error types.
//!
//! Two layers:
//!
//! - typed library errors (`CalcError`, `IntegrityError`) that say which rule was violated
//! - `AppError`, the binary-level error carrying a process exit code

use thiserror::Error;

use crate::domain::{Provider, RateField};

/// Exit code for bad input, bad flags, and I/O failures.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when the schedule table fails its startup self-check.
pub const EXIT_INTEGRITY: u8 = 3;

/// Per-request failures. Always recoverable at the request boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),

    #[error("invalid profile field `{field}`: {reason}")]
    InvalidProfile { field: &'static str, reason: String },
}

impl CalcError {
    /// Stable machine-readable code used in failure responses.
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::UnknownProcessor(_) => "unknown_processor",
            CalcError::InvalidProfile { .. } => "invalid_profile",
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidProfile {
            field,
            reason: reason.into(),
        }
    }
}

/// Schedule-table configuration problems found while building the registry.
///
/// These are fatal at startup: a table that fails this check must never serve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    #[error("{provider} {field} must be a fraction in [0, 1] (got {value})")]
    InvalidRate {
        provider: Provider,
        field: RateField,
        value: f64,
    },

    #[error("no schedule configured for {0}")]
    MissingSchedule(Provider),

    #[error("more than one schedule configured for {0}")]
    DuplicateSchedule(Provider),

    #[error(
        "reference {field} ({reference}) is more expensive than {provider} ({incumbent})"
    )]
    ReferenceExceedsIncumbent {
        provider: Provider,
        field: RateField,
        reference: f64,
        incumbent: f64,
    },

    #[error("failed to load schedule table: {0}")]
    Load(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError::new(EXIT_USAGE, err.to_string())
    }
}

impl From<IntegrityError> for AppError {
    fn from(err: IntegrityError) -> Self {
        AppError::new(EXIT_INTEGRITY, format!("Schedule integrity check failed: {err}"))
    }
}
