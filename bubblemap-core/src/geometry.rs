//! Data-space to pixel-space mapping.

use crate::config::{LayoutConfig, Viewport};
use crate::types::NormalizedPoint;
use serde::{Deserialize, Serialize};

/// Monotonic linear mapping from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }
}

/// Pixel radius from render size, proportional to the square root so bubble
/// area tracks size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    pub size_domain_max: f64,
    pub max_radius_px: f64,
}

impl RadiusScale {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            size_domain_max: config.size_domain_max(),
            max_radius_px: config.max_radius_px,
        }
    }

    pub fn radius(&self, render_size: f64) -> f64 {
        if !(render_size > 0.0) || !(self.size_domain_max > 0.0) {
            return 0.0;
        }
        let unit = LinearScale::new((0.0, 1.0), (0.0, self.max_radius_px));
        unit.map((render_size / self.size_domain_max).sqrt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// The three scales of one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub x: LinearScale,
    pub y: LinearScale,
    pub radius: RadiusScale,
}

impl ChartScales {
    pub fn new(x_domain: (f64, f64), y_domain: (f64, f64), viewport: &Viewport, config: &LayoutConfig) -> Self {
        Self {
            x: LinearScale::new(x_domain, viewport.x_range()),
            y: LinearScale::new(y_domain, viewport.y_range()),
            radius: RadiusScale::from_config(config),
        }
    }

    pub fn to_pixel(&self, point: &NormalizedPoint<'_>) -> PixelPoint {
        to_pixel(point, &self.x, &self.y, &self.radius)
    }
}

/// Data space to pixel space for one point.
pub fn to_pixel(
    point: &NormalizedPoint<'_>,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    radius_scale: &RadiusScale,
) -> PixelPoint {
    PixelPoint {
        x: x_scale.map(point.point.x),
        y: y_scale.map(point.point.y),
        radius: radius_scale.radius(point.render_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataPoint;

    #[test]
    fn test_linear_scale_with_inverted_range() {
        let y = LinearScale::new((0.0, 50.0), (540.0, 20.0));
        assert_eq!(y.map(0.0), 540.0);
        assert_eq!(y.map(50.0), 20.0);
        assert_eq!(y.map(25.0), 280.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_center() {
        let s = LinearScale::new((3.0, 3.0), (0.0, 100.0));
        assert_eq!(s.map(3.0), 50.0);
    }

    #[test]
    fn test_radius_is_sqrt_of_size_ratio() {
        let r = RadiusScale { size_domain_max: 1200.0, max_radius_px: 30.0 };
        assert_eq!(r.radius(1200.0), 30.0);
        assert_eq!(r.radius(300.0), 15.0);
        assert_eq!(r.radius(0.0), 0.0);
        assert_eq!(r.radius(f64::NAN), 0.0);
    }

    #[test]
    fn test_to_pixel() {
        let point = DataPoint::new("a", 10.0, 25.0, 1.0);
        let normalized = NormalizedPoint { point: &point, render_size: 1200.0 };
        let config = LayoutConfig::media_box();
        let viewport = Viewport::new(120.0, 100.0);
        let scales = ChartScales::new((0.0, 20.0), (0.0, 50.0), &viewport, &config);
        let px = scales.to_pixel(&normalized);
        assert_eq!(px.x, 60.0);
        assert_eq!(px.y, 50.0);
        assert_eq!(px.radius, config.max_radius_px);
    }
}
