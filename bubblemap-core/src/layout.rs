//! Full recompute of a chart layout.
//!
//! Normalization, overlap detection and label placement always run together
//! over the current visible set; nothing is cached between passes, so equal
//! inputs give equal layouts.

use crate::axes::{axis_domain, nice_ticks, Guides, ReferenceLines};
use crate::config::LayoutConfig;
use crate::geometry::{ChartScales, PixelPoint};
use crate::normalize::normalize_sizes;
use crate::overlap::OverlapDetector;
use crate::placement::{LabelPlacer, PlacementParams};
use crate::types::{Category, DataPoint, LabelOffset, LabelPosition, LabelState, OverlapPair, PointId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Presentation state that does not change the geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutOptions {
    pub highlight: Option<PointId>,
    pub affinity_line: Option<f64>,
}

/// One point as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPoint {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    /// Normalized size; 0 for hidden points
    pub render_size: f64,
    pub category: Category,
    pub visible: bool,
    pub label_offset: LabelOffset,
    pub label_state: LabelState,
    pub overlapping: bool,
    pub highlighted: bool,
    pub pixel: PixelPoint,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub points: Vec<RenderedPoint>,
    pub overlaps: Vec<OverlapPair>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub guides: Guides,
}

impl Layout {
    pub fn point(&self, id: &str) -> Option<&RenderedPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn visible_points(&self) -> impl Iterator<Item = &RenderedPoint> {
        self.points.iter().filter(|p| p.visible)
    }
}

/// Compute the layout of `points`. Pure: the result depends only on the arguments.
///
/// Every distinct id appears in the output in input order; a repeated id keeps
/// its first point. Hidden points keep any manual offset but take no part in
/// normalization, overlaps or domains.
pub fn recompute(
    points: &[DataPoint],
    overrides: &BTreeMap<String, LabelOffset>,
    config: &LayoutConfig,
    options: &LayoutOptions,
) -> Layout {
    let points = distinct_by_id(points);
    let visible: Vec<&DataPoint> = points.iter().copied().filter(|p| p.visible).collect();
    let normalized = normalize_sizes(&visible, &config.size_range);
    let overlaps = OverlapDetector::new(config).detect(&normalized);
    let placer = LabelPlacer::new(PlacementParams::from_config(config));
    let labels = placer.place(&normalized, &overlaps, overrides);

    let placed: Vec<_> = visible.iter().filter(|p| p.has_finite_position()).collect();
    let x_domain = axis_domain(placed.iter().map(|p| p.x), &config.x_axis);
    let y_domain = axis_domain(placed.iter().map(|p| p.y), &config.y_axis);
    let scales = ChartScales::new(x_domain, y_domain, &config.viewport, config);

    let xs: Vec<f64> = placed.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = placed.iter().map(|p| p.y).collect();
    let guides = Guides {
        x_ticks: nice_ticks(x_domain.0, x_domain.1, config.tick_count),
        y_ticks: nice_ticks(y_domain.0, y_domain.1, config.tick_count),
        reference: ReferenceLines::compute(&config.reference, &xs, &ys),
        affinity_line: options.affinity_line,
    };

    let overlapping: HashSet<&str> = overlaps
        .iter()
        .flat_map(|pair| [pair.a.as_str(), pair.b.as_str()])
        .collect();
    let by_id: HashMap<&str, usize> = normalized
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id(), i))
        .collect();

    let rendered = points
        .iter()
        .map(|&point| {
            let slot = if point.visible { by_id.get(point.id.as_str()).copied() } else { None };
            let (render_size, pixel, label) = match slot {
                Some(i) => (normalized[i].render_size, scales.to_pixel(&normalized[i]), labels[i].clone()),
                None => (0.0, hidden_pixel(point, &scales), hidden_label(point, overrides, &placer)),
            };
            RenderedPoint {
                id: point.id.clone(),
                x: point.x,
                y: point.y,
                render_size,
                category: point.category,
                visible: slot.is_some(),
                label_offset: label.offset,
                label_state: label.state,
                overlapping: slot.is_some() && overlapping.contains(point.id.as_str()),
                highlighted: slot.is_some() && options.highlight.as_deref() == Some(point.id.as_str()),
                pixel,
                metrics: point.metrics.clone(),
            }
        })
        .collect();

    log::debug!(
        "Recomputed layout: {} points, {} visible, {} overlap pairs",
        points.len(),
        normalized.len(),
        overlaps.len()
    );

    Layout { points: rendered, overlaps, x_domain, y_domain, guides }
}

/// First point of every id, in input order.
pub(crate) fn distinct_by_id(points: &[DataPoint]) -> Vec<&DataPoint> {
    let mut seen = HashSet::new();
    points
        .iter()
        .filter(|&p| {
            let first = seen.insert(p.id.as_str());
            if !first {
                log::warn!("Duplicate point '{}' ignored", p.id);
            }
            first
        })
        .collect()
}

fn hidden_pixel(point: &DataPoint, scales: &ChartScales) -> PixelPoint {
    PixelPoint { x: scales.x.map(point.x), y: scales.y.map(point.y), radius: 0.0 }
}

fn hidden_label(point: &DataPoint, overrides: &BTreeMap<String, LabelOffset>, placer: &LabelPlacer) -> LabelPosition {
    let (offset, state) = match overrides.get(&point.id) {
        Some(manual) => (LabelOffset::manual(manual.dx, manual.dy), LabelState::Manual),
        None => (placer.default_offset(), LabelState::Default),
    };
    LabelPosition { point_id: point.id.clone(), offset, state }
}
