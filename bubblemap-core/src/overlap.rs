//! Pairwise collision test in data space.

use crate::config::LayoutConfig;
use crate::types::{NormalizedPoint, OverlapPair};
use std::collections::BTreeSet;

/// Estimated data-space radius of a bubble.
pub fn data_radius(render_size: f64, size_domain_max: f64, k: f64) -> f64 {
    (render_size / size_domain_max).sqrt() * k
}

/// Overlap detector for one layout configuration
#[derive(Debug, Clone, Copy)]
pub struct OverlapDetector {
    size_domain_max: f64,
    radius_k: f64,
    tolerance: f64,
}

impl OverlapDetector {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            size_domain_max: config.size_domain_max(),
            radius_k: config.radius_k,
            tolerance: config.overlap_tolerance,
        }
    }

    fn radius(&self, point: &NormalizedPoint<'_>) -> Option<f64> {
        let size = point.render_size;
        if !(size > 0.0) || !size.is_finite() || !point.point.has_finite_position() {
            return None;
        }
        Some(data_radius(size, self.size_domain_max, self.radius_k))
    }

    /// Whether two points collide under this detector's tolerance.
    pub fn overlaps(&self, a: &NormalizedPoint<'_>, b: &NormalizedPoint<'_>) -> bool {
        let (Some(ra), Some(rb)) = (self.radius(a), self.radius(b)) else {
            return false;
        };
        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        let distance = (ax - bx).hypot(ay - by);
        distance < (ra + rb) * self.tolerance
    }

    /// All colliding pairs, each once and in canonical order.
    pub fn detect(&self, points: &[NormalizedPoint<'_>]) -> Vec<OverlapPair> {
        let mut pairs = BTreeSet::new();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                if !self.overlaps(a, b) {
                    continue;
                }
                if let Some(pair) = OverlapPair::new(a.id(), b.id()) {
                    pairs.insert(pair);
                }
            }
        }
        log::debug!("Overlap scan over {} points found {} pairs", points.len(), pairs.len());
        pairs.into_iter().collect()
    }
}

/// Convenience wrapper around [`OverlapDetector::detect`].
pub fn detect_overlaps(points: &[NormalizedPoint<'_>], config: &LayoutConfig) -> Vec<OverlapPair> {
    OverlapDetector::new(config).detect(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataPoint;

    fn config(tolerance: f64) -> LayoutConfig {
        LayoutConfig::media_box().with_tolerance(tolerance)
    }

    #[test]
    fn test_close_points_overlap_far_point_does_not() {
        let a = DataPoint::new("a", 10.0, 50.0, 1150.0);
        let b = DataPoint::new("b", 10.5, 52.0, 1180.0);
        let c = DataPoint::new("c", 80.0, 400.0, 1000.0);
        let points = vec![
            NormalizedPoint { point: &a, render_size: 1150.0 },
            NormalizedPoint { point: &b, render_size: 1180.0 },
            NormalizedPoint { point: &c, render_size: 1000.0 },
        ];
        let pairs = detect_overlaps(&points, &config(1.0));
        assert_eq!(pairs, vec![OverlapPair::new("a", "b").unwrap()]);
    }

    #[test]
    fn test_tolerance_scales_threshold() {
        // Radii are 4.0 each at full size, centers 7 apart
        let a = DataPoint::new("a", 0.0, 0.0, 1.0);
        let b = DataPoint::new("b", 7.0, 0.0, 1.0);
        let points = vec![
            NormalizedPoint { point: &a, render_size: 1200.0 },
            NormalizedPoint { point: &b, render_size: 1200.0 },
        ];
        assert_eq!(detect_overlaps(&points, &config(1.0)).len(), 1);
        assert!(detect_overlaps(&points, &config(0.8)).is_empty());
    }

    #[test]
    fn test_degenerate_points_never_overlap() {
        let a = DataPoint::new("a", 1.0, 1.0, 1.0);
        let b = DataPoint::new("b", 1.0, 1.0, 1.0);
        let c = DataPoint::new("c", f64::NAN, 1.0, 1.0);
        let points = vec![
            NormalizedPoint { point: &a, render_size: 1200.0 },
            NormalizedPoint { point: &b, render_size: 0.0 },
            NormalizedPoint { point: &c, render_size: 1200.0 },
        ];
        assert!(detect_overlaps(&points, &config(1.0)).is_empty());
    }

    #[test]
    fn test_pairs_are_canonical_regardless_of_input_order() {
        let z = DataPoint::new("zeta", 0.0, 0.0, 1.0);
        let a = DataPoint::new("alpha", 0.5, 0.0, 1.0);
        let points = vec![
            NormalizedPoint { point: &z, render_size: 700.0 },
            NormalizedPoint { point: &a, render_size: 700.0 },
        ];
        let pairs = detect_overlaps(&points, &config(1.0));
        assert_eq!(pairs[0].a, "alpha");
        assert_eq!(pairs[0].b, "zeta");
    }
}
