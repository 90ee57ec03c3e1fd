//! CSV output of a run: per-step counts and the final position of every person.
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use csv::Writer;
use log::info;
use serde::Serialize;

use crate::error::SimError;
use crate::simulation::Simulation;

pub const COUNTS_REPORT: &str = "counts.csv";
pub const POSITIONS_REPORT: &str = "positions.csv";

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful.
fn generate_validate_filepath(path: &Path) -> Result<File, SimError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(SimError::ReportError(format!(
            "Report output files must be CSVs, got {}",
            path.display()
        ))),
    }
}

/// Writes `rows` to a new CSV file at `path`, with a header taken from the row type.
pub fn write_report<T, I>(path: &Path, rows: I) -> Result<(), SimError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = generate_validate_filepath(path)?;
    let mut writer = Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the step reports and a snapshot of the population to `output_dir`.
pub fn write_simulation_reports(
    simulation: &Simulation,
    output_dir: &Path,
) -> Result<(), SimError> {
    let counts_path = output_dir.join(COUNTS_REPORT);
    write_report(&counts_path, simulation.reports())?;
    let positions_path = output_dir.join(POSITIONS_REPORT);
    write_report(&positions_path, simulation.population().snapshot())?;
    info!("Wrote reports to {}", output_dir.display());
    Ok(())
}
