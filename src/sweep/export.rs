//! Export sweep rows to CSV.
//!
//! One row per grid point, ready for a spreadsheet.

use std::path::Path;

use crate::error::{AppError, EXIT_USAGE};
use crate::sweep::SweepRow;

pub fn write_sweep_csv(path: &Path, rows: &[SweepRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
