//! Percentage detection and min-max size scaling.

use crate::types::{DataPoint, NormalizedPoint};
use serde::{Deserialize, Serialize};

/// Rescale a ratio-like value given as a fraction into a percentage.
///
/// Values strictly between 0 and 1 are multiplied by 100; everything else
/// passes through unchanged.
pub fn as_percent(value: f64) -> f64 {
    if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// Target interval for render sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 200.0, max: 1200.0 }
    }
}

impl SizeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Linear map of `size` from `[size_min, size_max]` into this range.
    pub fn scale(&self, size: f64, size_min: f64, size_max: f64) -> f64 {
        let span = size_max - size_min;
        if !size.is_finite() || span <= 0.0 || !span.is_finite() {
            return self.midpoint();
        }
        self.min + (size - size_min) / span * (self.max - self.min)
    }
}

/// Min and max raw size over the finite sizes of `points`.
pub fn size_extent<'a, I>(points: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a DataPoint>,
{
    points
        .into_iter()
        .map(|p| p.size)
        .filter(|s| s.is_finite())
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
}

/// Normalize the sizes of the given points against each other.
///
/// Callers pass the currently visible set; the scale is relative to it.
pub fn normalize_sizes<'a>(points: &[&'a DataPoint], range: &SizeRange) -> Vec<NormalizedPoint<'a>> {
    let (lo, hi) = size_extent(points.iter().copied()).unwrap_or((0.0, 0.0));
    points
        .iter()
        .map(|&point| NormalizedPoint {
            point,
            render_size: range.scale(point.size, lo, hi),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_percent() {
        assert_eq!(as_percent(0.481), 48.1);
        assert_eq!(as_percent(0.0), 0.0);
        assert_eq!(as_percent(1.0), 1.0);
        assert_eq!(as_percent(-0.5), -0.5);
        assert_eq!(as_percent(133.0), 133.0);
    }

    #[test]
    fn test_normalize_spans_range() {
        let a = DataPoint::new("a", 0.0, 0.0, 10.0);
        let b = DataPoint::new("b", 0.0, 0.0, 20.0);
        let c = DataPoint::new("c", 0.0, 0.0, 15.0);
        let out = normalize_sizes(&[&a, &b, &c], &SizeRange::default());
        assert_eq!(out[0].render_size, 200.0);
        assert_eq!(out[1].render_size, 1200.0);
        assert_eq!(out[2].render_size, 700.0);
    }

    #[test]
    fn test_equal_sizes_collapse_to_midpoint() {
        let a = DataPoint::new("a", 0.0, 0.0, 5.0);
        let b = DataPoint::new("b", 1.0, 1.0, 5.0);
        let out = normalize_sizes(&[&a, &b], &SizeRange::default());
        assert!(out.iter().all(|n| n.render_size == 700.0));

        let single = normalize_sizes(&[&a], &SizeRange::new(0.0, 10.0));
        assert_eq!(single[0].render_size, 5.0);
    }

    #[test]
    fn test_non_finite_size_gets_midpoint() {
        let a = DataPoint::new("a", 0.0, 0.0, 1.0);
        let b = DataPoint::new("b", 0.0, 0.0, f64::NAN);
        let c = DataPoint::new("c", 0.0, 0.0, 3.0);
        let out = normalize_sizes(&[&a, &b, &c], &SizeRange::default());
        assert_eq!(out[0].render_size, 200.0);
        assert_eq!(out[1].render_size, 700.0);
        assert_eq!(out[2].render_size, 1200.0);
    }
}
