//! Extract command implementation - spreadsheet grid to chart records

use anyhow::Result;
use bubblemap_core::ChartKind;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;

pub fn execute(config: &Config, input: PathBuf, kind: ChartKind, output: Option<PathBuf>) -> Result<()> {
    log::info!("Extracting {} records from {}", kind, input.display());

    let grid = super::read_grid(&input)?;
    let extraction = bubblemap_core::extract(&grid, kind).map_err(CliError::from)?;

    log::info!(
        "Target '{}': {} records",
        extraction.target_name,
        extraction.points.len()
    );
    super::write_json(&extraction, output.as_ref(), config.general.pretty_json)
}
