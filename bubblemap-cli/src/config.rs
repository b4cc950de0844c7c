//! Configuration handling for the Bubblemap CLI
//!
//! Supports loading layout tuning from bubblemap.toml files. Every field of a
//! chart table is optional; missing fields keep the built-in preset.

use anyhow::{Context, Result};
use bubblemap_core::{ChartKind, LayoutConfig};
use bubblemap_core::normalize::SizeRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bubblemap.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub media_box: ChartSection,

    #[serde(default)]
    pub affinity_map: ChartSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Chart kind used when `--kind` is not given
    #[serde(default = "default_kind")]
    pub default_kind: ChartKind,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

/// Overrides for one chart preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_tolerance: Option<f64>,

    /// Data-space radius at the largest render size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_k: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_angles: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_distance_px: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_radius_px: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<usize>,

    /// Viewport width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

// Default value functions
fn default_kind() -> ChartKind { ChartKind::MediaBox }
fn default_true() -> bool { true }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
            pretty_json: true,
        }
    }
}

impl ChartSection {
    /// Section spelling out every value of `layout`
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            overlap_tolerance: Some(layout.overlap_tolerance),
            radius_k: Some(layout.radius_k),
            candidate_angles: Some(layout.candidate_angles),
            search_radius: Some(layout.search_radius),
            label_distance_px: Some(layout.label_distance_px),
            max_radius_px: Some(layout.max_radius_px),
            size_min: Some(layout.size_range.min),
            size_max: Some(layout.size_range.max),
            tick_count: Some(layout.tick_count),
            width: Some(layout.viewport.width),
            height: Some(layout.viewport.height),
        }
    }

    /// Overlay the values present in this section onto `base`
    pub fn apply(&self, mut base: LayoutConfig) -> LayoutConfig {
        if let Some(v) = self.overlap_tolerance { base.overlap_tolerance = v; }
        if let Some(v) = self.radius_k { base.radius_k = v; }
        if let Some(v) = self.candidate_angles { base.candidate_angles = v; }
        if let Some(v) = self.search_radius { base.search_radius = v; }
        if let Some(v) = self.label_distance_px { base.label_distance_px = v; }
        if let Some(v) = self.max_radius_px { base.max_radius_px = v; }
        if let Some(v) = self.tick_count { base.tick_count = v; }
        if let Some(v) = self.width { base.viewport.width = v; }
        if let Some(v) = self.height { base.viewport.height = v; }
        base.size_range = SizeRange::new(
            self.size_min.unwrap_or(base.size_range.min),
            self.size_max.unwrap_or(base.size_range.max),
        );
        base
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            media_box: ChartSection::from_layout(&LayoutConfig::media_box()),
            affinity_map: ChartSection::from_layout(&LayoutConfig::affinity_map()),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()).into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default configuration")
    }

    pub fn section(&self, kind: ChartKind) -> &ChartSection {
        match kind {
            ChartKind::MediaBox => &self.media_box,
            ChartKind::AffinityMap => &self.affinity_map,
        }
    }

    /// Preset for `kind` with this file's overrides, checked for usable values
    pub fn layout_for(&self, kind: ChartKind) -> CliResult<LayoutConfig> {
        let layout = self.section(kind).apply(LayoutConfig::for_kind(kind));
        layout
            .validate()
            .map_err(|e| CliError::config(format!("[{}] {}", section_name(kind), e)))?;
        Ok(layout)
    }
}

fn section_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::MediaBox => "media_box",
        ChartKind::AffinityMap => "affinity_map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.default_kind, ChartKind::MediaBox);
        assert_eq!(config.media_box.overlap_tolerance, Some(0.95));
        assert_eq!(config.affinity_map.candidate_angles, Some(12));
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let config = Config::default();
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(config.media_box, loaded_config.media_box);
        assert_eq!(config.affinity_map, loaded_config.affinity_map);
        assert_eq!(config.general.default_kind, loaded_config.general.default_kind);

        Ok(())
    }

    #[test]
    fn test_example_toml_generation() -> Result<()> {
        let example = Config::example_toml()?;
        assert!(example.contains("[general]"));
        assert!(example.contains("[media_box]"));
        assert!(example.contains("[affinity_map]"));
        assert!(example.contains("default_kind = \"media-box\""));
        Ok(())
    }

    #[test]
    fn test_partial_section_keeps_preset() {
        let config: Config = toml::from_str("[affinity_map]\noverlap_tolerance = 1.0\n").unwrap();
        let layout = config.layout_for(ChartKind::AffinityMap).unwrap();
        assert_eq!(layout.overlap_tolerance, 1.0);
        assert_eq!(layout.radius_k, 6.0);
        assert_eq!(config.layout_for(ChartKind::MediaBox).unwrap(), LayoutConfig::media_box());
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let config: Config = toml::from_str("[media_box]\ncandidate_angles = 4\n").unwrap();
        let err = config.layout_for(ChartKind::MediaBox).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("candidate_angles"));
    }
}
