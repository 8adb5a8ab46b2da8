//! Domain types used throughout the calculator.
//!
//! This module defines:
//!
//! - provider identities (`ProcessorId`, `Provider`) and fee schedules (`FeeSchedule`)
//! - the validated input profile (`BusinessProfile`)
//! - calculation outputs (`CostBreakdown`, `SavingsSummary`, `Comparison`)

pub mod types;

pub use types::*;
