//! Command implementations for the Bubblemap CLI

pub mod config;
pub mod extract;
pub mod layout;

use anyhow::{Context, Result};
use bubblemap_core::Grid;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Read and parse a JSON grid file
pub fn read_grid(path: &Path) -> Result<Grid> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grid file: {}", path.display()))?;
    let grid = Grid::from_json_str(&content)
        .map_err(|e| CliError::invalid_format(format!("{}: {}", path.display(), e)))?;
    log::debug!("Read grid with {} rows from {}", grid.row_count(), path.display());
    Ok(grid)
}

/// Serialize `value` as JSON to `output`, or stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(CliError::from)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            log::info!("Output: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
