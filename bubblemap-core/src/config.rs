//! Layout parameters and the two chart presets.
//!
//! Both chart variants run the same engine; they differ only in the tuning
//! values collected here.

use crate::error::ConfigError;
use crate::normalize::SizeRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which chart a data set feeds. Selects both the extraction schema and the layout preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    MediaBox,
    AffinityMap,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::MediaBox => "media-box",
            ChartKind::AffinityMap => "affinity-map",
        }
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "media-box" | "mediabox" | "box" => Ok(ChartKind::MediaBox),
            "affinity-map" | "affinitymap" | "afinimap" => Ok(ChartKind::AffinityMap),
            other => Err(format!("unknown chart kind: {}", other)),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain rule for one axis.
///
/// The upper bound is the largest visible value rounded up to `grid`, plus
/// `margin`. The lower bound is `origin`, extended down on the same grid when
/// data falls below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRule {
    pub origin: f64,
    pub grid: f64,
    pub margin: f64,
}

impl AxisRule {
    pub fn new(origin: f64, grid: f64, margin: f64) -> Self {
        Self { origin, grid, margin }
    }
}

/// Pixel area of the plot, including the margins reserved for axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
        }
    }

    pub fn with_margins(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }

    /// Horizontal pixel span of the plot area
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin_left, (self.width - self.margin_right).max(self.margin_left))
    }

    /// Vertical pixel span, bottom first so larger values sit higher
    pub fn y_range(&self) -> (f64, f64) {
        ((self.height - self.margin_bottom).max(self.margin_top), self.margin_top)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1000.0, 600.0).with_margins(20.0, 20.0, 60.0, 60.0)
    }
}

/// How the quadrant reference lines are placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum ReferenceRule {
    /// Mean of visible x and y
    Mean,
    /// Median of visible x; median of visible y when every y is at least
    /// `y_floor`, otherwise `y_floor` itself
    Median { y_floor: f64 },
}

/// Tuning of the overlap and placement engine for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Render size interval; its upper bound is the size domain maximum
    pub size_range: SizeRange,
    /// Data-space radius of a bubble at the maximum render size
    pub radius_k: f64,
    /// Multiplier on the sum of two radii below which points collide
    pub overlap_tolerance: f64,
    /// Number of evenly spaced angles tried for a displaced label
    pub candidate_angles: usize,
    /// Data-space distance of the trial label anchor from the center
    pub search_radius: f64,
    /// Pixel distance of a label from its point center
    pub label_distance_px: f64,
    /// Pixel radius of a bubble at the maximum render size
    pub max_radius_px: f64,
    pub x_axis: AxisRule,
    pub y_axis: AxisRule,
    pub tick_count: usize,
    pub reference: ReferenceRule,
    pub viewport: Viewport,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::media_box()
    }
}

impl LayoutConfig {
    /// Dense media chart: consumption against high-consumer share.
    pub fn media_box() -> Self {
        Self {
            size_range: SizeRange::new(200.0, 1200.0),
            radius_k: 4.0,
            overlap_tolerance: 0.95,
            candidate_angles: 8,
            search_radius: 5.0,
            label_distance_px: 18.0,
            max_radius_px: 30.0,
            x_axis: AxisRule::new(0.0, 10.0, 10.0),
            y_axis: AxisRule::new(0.0, 10.0, 5.0),
            tick_count: 8,
            reference: ReferenceRule::Mean,
            viewport: Viewport::new(1000.0, 600.0).with_margins(20.0, 20.0, 60.0, 60.0),
        }
    }

    /// Sparse affinity chart: consumption percentage against affinity index.
    pub fn affinity_map() -> Self {
        Self {
            size_range: SizeRange::new(200.0, 1200.0),
            radius_k: 6.0,
            overlap_tolerance: 1.2,
            candidate_angles: 12,
            search_radius: 8.0,
            label_distance_px: 25.0,
            max_radius_px: 24.0,
            x_axis: AxisRule::new(0.0, 10.0, 5.0),
            y_axis: AxisRule::new(100.0, 50.0, 10.0),
            tick_count: 8,
            reference: ReferenceRule::Median { y_floor: 100.0 },
            viewport: Viewport::new(1000.0, 600.0).with_margins(60.0, 60.0, 80.0, 80.0),
        }
    }

    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::MediaBox => Self::media_box(),
            ChartKind::AffinityMap => Self::affinity_map(),
        }
    }

    pub fn size_domain_max(&self) -> f64 {
        self.size_range.max
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.overlap_tolerance = tolerance;
        self
    }

    /// Check every tuning value is inside the range the engine expects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.overlap_tolerance;
        if !(tol > 0.0 && tol <= 1.3) {
            return Err(ConfigError::out_of_range("overlap_tolerance", tol, "(0, 1.3]"));
        }
        if self.candidate_angles < 8 {
            return Err(ConfigError::out_of_range(
                "candidate_angles",
                self.candidate_angles as f64,
                ">= 8",
            ));
        }
        let SizeRange { min, max } = self.size_range;
        if !(min >= 0.0 && max > min && max.is_finite()) {
            return Err(ConfigError::out_of_range("size_range.max", max, "> size_range.min >= 0"));
        }
        for (field, value) in [
            ("radius_k", self.radius_k),
            ("search_radius", self.search_radius),
            ("label_distance_px", self.label_distance_px),
            ("max_radius_px", self.max_radius_px),
            ("x_axis.grid", self.x_axis.grid),
            ("y_axis.grid", self.y_axis.grid),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::out_of_range(field, value, "> 0"));
            }
        }
        if self.tick_count < 2 {
            return Err(ConfigError::out_of_range("tick_count", self.tick_count as f64, ">= 2"));
        }
        Ok(())
    }
}
