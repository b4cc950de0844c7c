//! Label placement
//!
//! A label sits straight above its point unless the point collides with a
//! neighbour. Colliding points search a ring of candidate directions for the
//! one farthest from every other visible point. A manual offset from a drag
//! overrides both until it is reset.

use crate::config::LayoutConfig;
use crate::types::{LabelOffset, LabelPosition, LabelState, NormalizedPoint, OverlapPair};
use std::collections::{BTreeMap, HashSet};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Parameters of the candidate-angle search
#[derive(Debug, Clone)]
pub struct PlacementParams {
    /// Number of evenly spaced directions to try
    pub candidate_angles: usize,
    /// Data-space distance of each trial anchor from the point center
    pub search_radius: f64,
    /// Pixel distance of the label from the point center
    pub label_distance_px: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl PlacementParams {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            candidate_angles: config.candidate_angles,
            search_radius: config.search_radius,
            label_distance_px: config.label_distance_px,
        }
    }
}

/// Candidate directions in radians, starting straight up and turning counter-clockwise.
pub fn candidate_angles(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| FRAC_PI_2 + TAU * i as f64 / count as f64)
        .collect()
}

#[derive(Debug, Clone)]
pub struct LabelPlacer {
    params: PlacementParams,
    angles: Vec<f64>,
}

impl LabelPlacer {
    pub fn new(params: PlacementParams) -> Self {
        let angles = candidate_angles(params.candidate_angles);
        Self { params, angles }
    }

    /// Offset used when nothing collides: straight up.
    pub fn default_offset(&self) -> LabelOffset {
        LabelOffset::computed(0.0, -self.params.label_distance_px)
    }

    /// Direction whose trial anchor is farthest from every other point.
    ///
    /// The score of an angle is the smallest distance from its trial anchor to
    /// another point's center. Only a strictly greater score replaces the
    /// current best, so ties keep the earlier angle.
    pub fn best_angle(&self, index: usize, points: &[NormalizedPoint<'_>]) -> Option<f64> {
        let (cx, cy) = points.get(index)?.center();
        let mut best: Option<(f64, f64)> = None;

        for &theta in &self.angles {
            let ax = cx + self.params.search_radius * theta.cos();
            let ay = cy + self.params.search_radius * theta.sin();
            let score = points
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != index && other.point.has_finite_position())
                .map(|(_, other)| {
                    let (ox, oy) = other.center();
                    (ax - ox).hypot(ay - oy)
                })
                .fold(f64::INFINITY, f64::min);
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((theta, score)),
            }
        }

        best.map(|(theta, _)| theta)
    }

    /// Pixel offset along `theta`. Screen y grows downward.
    pub fn offset_for_angle(&self, theta: f64) -> LabelOffset {
        let d = self.params.label_distance_px;
        LabelOffset::computed(theta.cos() * d, -theta.sin() * d)
    }

    /// Position every label. `points` is the visible set in output order.
    pub fn place(
        &self,
        points: &[NormalizedPoint<'_>],
        overlaps: &[OverlapPair],
        overrides: &BTreeMap<String, LabelOffset>,
    ) -> Vec<LabelPosition> {
        let overlapping: HashSet<&str> = overlaps
            .iter()
            .flat_map(|pair| [pair.a.as_str(), pair.b.as_str()])
            .collect();

        let mut displaced = 0usize;
        let positions: Vec<LabelPosition> = points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let id = point.id();
                let (offset, state) = if let Some(manual) = overrides.get(id) {
                    (LabelOffset::manual(manual.dx, manual.dy), LabelState::Manual)
                } else if overlapping.contains(id) {
                    displaced += 1;
                    match self.best_angle(index, points) {
                        Some(theta) => (self.offset_for_angle(theta), LabelState::Displaced),
                        None => (self.default_offset(), LabelState::Displaced),
                    }
                } else {
                    (self.default_offset(), LabelState::Default)
                };
                LabelPosition { point_id: id.to_string(), offset, state }
            })
            .collect();

        log::debug!(
            "Placed {} labels ({} displaced, {} manual)",
            positions.len(),
            displaced,
            positions.iter().filter(|p| p.state == LabelState::Manual).count()
        );
        positions
    }
}

/// Place labels with parameters taken from `config`.
pub fn place_labels(
    points: &[NormalizedPoint<'_>],
    overlaps: &[OverlapPair],
    overrides: &BTreeMap<String, LabelOffset>,
    config: &LayoutConfig,
) -> Vec<LabelPosition> {
    LabelPlacer::new(PlacementParams::from_config(config)).place(points, overlaps, overrides)
}
