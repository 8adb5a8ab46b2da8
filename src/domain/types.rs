//! Shared domain types.
//!
//! Inputs (`BusinessProfile`) are validated on construction; outputs
//! (`CostBreakdown`, `SavingsSummary`) derive their totals internally so they
//! can never drift from their components.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Incumbent payment processors the calculator knows about.
///
/// This is a closed set: anything else is rejected as `UnknownProcessor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorId {
    Stripe,
    Paypal,
    Paddle,
    /// Lemon Squeezy.
    Lemon,
}

impl ProcessorId {
    pub const ALL: [ProcessorId; 4] = [
        ProcessorId::Stripe,
        ProcessorId::Paypal,
        ProcessorId::Paddle,
        ProcessorId::Lemon,
    ];

    /// Wire identifier (`stripe`, `paypal`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessorId::Stripe => "stripe",
            ProcessorId::Paypal => "paypal",
            ProcessorId::Paddle => "paddle",
            ProcessorId::Lemon => "lemon",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ProcessorId::Stripe => "Stripe",
            ProcessorId::Paypal => "PayPal",
            ProcessorId::Paddle => "Paddle",
            ProcessorId::Lemon => "Lemon Squeezy",
        }
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessorId {
    type Err = CalcError;

    /// Case-insensitive, whitespace-tolerant parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(ProcessorId::Stripe),
            "paypal" => Ok(ProcessorId::Paypal),
            "paddle" => Ok(ProcessorId::Paddle),
            "lemon" | "lemonsqueezy" | "lemon_squeezy" => Ok(ProcessorId::Lemon),
            _ => Err(CalcError::UnknownProcessor(s.to_string())),
        }
    }
}

/// Name of the reference provider on the wire.
pub const REFERENCE_ID: &str = "paaaid";

/// Owner of a fee schedule: one of the incumbents, or the reference provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provider {
    Incumbent(ProcessorId),
    Reference,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Incumbent(p) => p.display_name(),
            Provider::Reference => "Paaaid",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Incumbent(p) => f.write_str(p.as_str()),
            Provider::Reference => f.write_str(REFERENCE_ID),
        }
    }
}

impl FromStr for Provider {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(REFERENCE_ID) {
            return Ok(Provider::Reference);
        }
        s.parse().map(Provider::Incumbent)
    }
}

impl TryFrom<String> for Provider {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.to_string()
    }
}

/// The five rate parameters of a fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateField {
    BaseFee,
    FxMarkup,
    Chargeback,
    TaxOverhead,
    FailedPaymentRecovery,
}

impl RateField {
    pub const ALL: [RateField; 5] = [
        RateField::BaseFee,
        RateField::FxMarkup,
        RateField::Chargeback,
        RateField::TaxOverhead,
        RateField::FailedPaymentRecovery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RateField::BaseFee => "base_fee_rate",
            RateField::FxMarkup => "fx_markup_rate",
            RateField::Chargeback => "chargeback_rate",
            RateField::TaxOverhead => "tax_overhead_rate",
            RateField::FailedPaymentRecovery => "failed_payment_recovery_rate",
        }
    }
}

impl fmt::Display for RateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider cost parameters. All rates are fractions (0.029 = 2.9%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    #[serde(rename = "processor")]
    pub provider: Provider,
    /// Fraction of MRR charged as processing fee.
    pub base_fee_rate: f64,
    /// Applied to the cross-border share of volume.
    pub fx_markup_rate: f64,
    /// Fraction of MRR lost to chargebacks.
    pub chargeback_rate: f64,
    /// Applied to the EU-customer share of volume.
    pub tax_overhead_rate: f64,
    /// Applied to the failed-payment share of volume.
    pub failed_payment_recovery_rate: f64,
}

impl FeeSchedule {
    pub fn rate(&self, field: RateField) -> f64 {
        match field {
            RateField::BaseFee => self.base_fee_rate,
            RateField::FxMarkup => self.fx_markup_rate,
            RateField::Chargeback => self.chargeback_rate,
            RateField::TaxOverhead => self.tax_overhead_rate,
            RateField::FailedPaymentRecovery => self.failed_payment_recovery_rate,
        }
    }
}

/// Identifies one published schedule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryVersion {
    pub label: String,
    pub effective: NaiveDate,
}

/// A validated business profile.
///
/// Only constructible through [`BusinessProfile::new`], which rejects a
/// non-positive MRR and clamps every percentage into `[0, 100]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    mrr: f64,
    processor: ProcessorId,
    international_percent: f64,
    eu_percent: f64,
    failed_payment_rate: f64,
}

impl BusinessProfile {
    pub fn new(
        mrr: f64,
        processor: ProcessorId,
        international_percent: f64,
        eu_percent: f64,
        failed_payment_rate: f64,
    ) -> Result<Self, CalcError> {
        if !(mrr.is_finite() && mrr > 0.0) {
            return Err(CalcError::invalid(
                "mrr",
                format!("must be a finite number greater than zero (got {mrr})"),
            ));
        }
        Ok(Self {
            mrr,
            processor,
            international_percent: clamp_percent("international_percent", international_percent)?,
            eu_percent: clamp_percent("eu_percent", eu_percent)?,
            failed_payment_rate: clamp_percent("failed_payment_rate", failed_payment_rate)?,
        })
    }

    pub fn mrr(&self) -> f64 {
        self.mrr
    }

    pub fn processor(&self) -> ProcessorId {
        self.processor
    }

    pub fn international_percent(&self) -> f64 {
        self.international_percent
    }

    pub fn eu_percent(&self) -> f64 {
        self.eu_percent
    }

    pub fn failed_payment_rate(&self) -> f64 {
        self.failed_payment_rate
    }
}

/// Clamp a percentage into `[0, 100]`. Infinities clamp; NaN cannot.
pub(crate) fn clamp_percent(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_nan() {
        return Err(CalcError::invalid(field, "not a number"));
    }
    Ok(value.clamp(0.0, 100.0))
}

/// Cost categories, in the order they are summed and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCategory {
    PaymentFees,
    FxFees,
    FailedPayments,
    TaxOverhead,
    Chargebacks,
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::PaymentFees,
        CostCategory::FxFees,
        CostCategory::FailedPayments,
        CostCategory::TaxOverhead,
        CostCategory::Chargebacks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::PaymentFees => "Payment Fees",
            CostCategory::FxFees => "FX Fees",
            CostCategory::FailedPayments => "Failed Payments",
            CostCategory::TaxOverhead => "Tax Overhead",
            CostCategory::Chargebacks => "Chargebacks",
        }
    }
}

/// Monthly cost of one provider, split by category.
///
/// `total` is always the sum of the five categories; there is no way to set it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    payment_fees: f64,
    fx_fees: f64,
    failed_payments: f64,
    tax_overhead: f64,
    chargebacks: f64,
    total: f64,
}

impl CostBreakdown {
    pub fn new(
        payment_fees: f64,
        fx_fees: f64,
        failed_payments: f64,
        tax_overhead: f64,
        chargebacks: f64,
    ) -> Self {
        let total = payment_fees + fx_fees + failed_payments + tax_overhead + chargebacks;
        Self {
            payment_fees,
            fx_fees,
            failed_payments,
            tax_overhead,
            chargebacks,
            total,
        }
    }

    pub fn payment_fees(&self) -> f64 {
        self.payment_fees
    }

    pub fn fx_fees(&self) -> f64 {
        self.fx_fees
    }

    pub fn failed_payments(&self) -> f64 {
        self.failed_payments
    }

    pub fn tax_overhead(&self) -> f64 {
        self.tax_overhead
    }

    pub fn chargebacks(&self) -> f64 {
        self.chargebacks
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn amount(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::PaymentFees => self.payment_fees,
            CostCategory::FxFees => self.fx_fees,
            CostCategory::FailedPayments => self.failed_payments,
            CostCategory::TaxOverhead => self.tax_overhead,
            CostCategory::Chargebacks => self.chargebacks,
        }
    }
}

/// Difference between the incumbent and the reference provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsSummary {
    /// Monthly saving.
    pub total: f64,
    /// Saving as a share of the incumbent's total, in `[0, 100]`.
    pub percentage: f64,
    /// `total * 12`.
    pub annual: f64,
}

impl SavingsSummary {
    pub fn between(current: &CostBreakdown, reference: &CostBreakdown) -> Self {
        let total = current.total() - reference.total();
        let percentage = if current.total() == 0.0 {
            0.0
        } else {
            total / current.total() * 100.0
        };
        Self {
            total,
            percentage,
            annual: total * 12.0,
        }
    }
}

/// Incumbent vs. reference comparison for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub current: CostBreakdown,
    pub paaaid: CostBreakdown,
    pub savings: SavingsSummary,
}
