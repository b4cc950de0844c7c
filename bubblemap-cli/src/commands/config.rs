//! Config command implementation - print or write configuration

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> Result<()> {
    let content = if example {
        Config::example_toml()?
    } else {
        toml::to_string_pretty(config).context("Failed to serialize configuration")?
    };

    match output {
        Some(path) => {
            if example {
                Config::default().save_to_file(&path)?;
            } else {
                config.save_to_file(&path)?;
            }
            log::info!("Configuration written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", content).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
