//! Fee schedule registry.
//!
//! The registry is built once at startup, checked, and then only read:
//!
//! 1. every rate is finite and non-negative
//! 2. there is exactly one schedule per incumbent and exactly one reference schedule
//! 3. for every incumbent and every rate field, `reference <= incumbent`
//!
//! Rule 3 is what keeps every computed saving non-negative.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{FeeSchedule, ProcessorId, Provider, RateField, RegistryVersion};
use crate::error::{CalcError, IntegrityError};

pub mod builtin;

pub use builtin::builtin_table;

/// On-disk / serialized form of a schedule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTable {
    pub version: RegistryVersion,
    pub schedules: Vec<FeeSchedule>,
}

/// Validated, read-only set of fee schedules.
#[derive(Debug, Clone)]
pub struct FeeScheduleRegistry {
    version: RegistryVersion,
    /// Ordered as `ProcessorId::ALL`.
    incumbents: Vec<FeeSchedule>,
    reference: FeeSchedule,
}

impl FeeScheduleRegistry {
    /// Validate a set of schedules and freeze them into a registry.
    pub fn new(version: RegistryVersion, schedules: Vec<FeeSchedule>) -> Result<Self, IntegrityError> {
        let mut slots: [Option<FeeSchedule>; 4] = [None, None, None, None];
        let mut reference: Option<FeeSchedule> = None;

        for schedule in schedules {
            check_rates(&schedule)?;
            let slot = match schedule.provider {
                Provider::Incumbent(p) => &mut slots[slot_index(p)],
                Provider::Reference => &mut reference,
            };
            if slot.is_some() {
                return Err(IntegrityError::DuplicateSchedule(schedule.provider));
            }
            *slot = Some(schedule);
        }

        let reference = reference.ok_or(IntegrityError::MissingSchedule(Provider::Reference))?;

        let mut incumbents = Vec::with_capacity(ProcessorId::ALL.len());
        for (p, slot) in ProcessorId::ALL.into_iter().zip(slots) {
            let schedule = slot.ok_or(IntegrityError::MissingSchedule(Provider::Incumbent(p)))?;
            check_dominance(&reference, &schedule)?;
            incumbents.push(schedule);
        }

        info!(
            version = %version.label,
            effective = %version.effective,
            "fee schedule registry validated"
        );

        Ok(Self {
            version,
            incumbents,
            reference,
        })
    }

    /// Registry over the shipped table.
    pub fn builtin() -> Result<Self, IntegrityError> {
        Self::from_table(builtin_table())
    }

    pub fn from_table(table: ScheduleTable) -> Result<Self, IntegrityError> {
        Self::new(table.version, table.schedules)
    }

    /// Load and validate a schedule table from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, IntegrityError> {
        debug!(path = %path.display(), "loading schedule table");
        let raw = fs::read_to_string(path)
            .map_err(|e| IntegrityError::Load(format!("cannot read '{}': {e}", path.display())))?;
        let table: ScheduleTable = serde_json::from_str(&raw)
            .map_err(|e| IntegrityError::Load(format!("invalid schedule JSON '{}': {e}", path.display())))?;
        Self::from_table(table)
    }

    pub fn version(&self) -> &RegistryVersion {
        &self.version
    }

    /// Schedule of an incumbent processor.
    pub fn schedule(&self, processor: ProcessorId) -> &FeeSchedule {
        &self.incumbents[slot_index(processor)]
    }

    /// Look up an incumbent by wire name.
    pub fn schedule_by_name(&self, name: &str) -> Result<&FeeSchedule, CalcError> {
        let processor: ProcessorId = name.parse()?;
        Ok(self.schedule(processor))
    }

    /// The reference provider's schedule.
    pub fn reference(&self) -> &FeeSchedule {
        &self.reference
    }

    /// All five schedules, incumbents first.
    pub fn schedules(&self) -> impl Iterator<Item = &FeeSchedule> {
        self.incumbents.iter().chain(std::iter::once(&self.reference))
    }

    pub fn to_table(&self) -> ScheduleTable {
        ScheduleTable {
            version: self.version.clone(),
            schedules: self.schedules().cloned().collect(),
        }
    }
}

fn slot_index(processor: ProcessorId) -> usize {
    match processor {
        ProcessorId::Stripe => 0,
        ProcessorId::Paypal => 1,
        ProcessorId::Paddle => 2,
        ProcessorId::Lemon => 3,
    }
}

fn check_rates(schedule: &FeeSchedule) -> Result<(), IntegrityError> {
    for field in RateField::ALL {
        let value = schedule.rate(field);
        if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
            return Err(IntegrityError::InvalidRate {
                provider: schedule.provider,
                field,
                value,
            });
        }
    }
    Ok(())
}

fn check_dominance(reference: &FeeSchedule, incumbent: &FeeSchedule) -> Result<(), IntegrityError> {
    for field in RateField::ALL {
        let (r, i) = (reference.rate(field), incumbent.rate(field));
        if r > i {
            return Err(IntegrityError::ReferenceExceedsIncumbent {
                provider: incumbent.provider,
                field,
                reference: r,
                incumbent: i,
            });
        }
    }
    Ok(())
}
