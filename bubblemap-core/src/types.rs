//! Core data types shared by extraction, layout and the chart state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type PointId = String;

/// Media category of a point. Charts without a category use `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Online,
    Offline,
    #[default]
    None,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Online => "online",
            Category::Offline => "offline",
            Category::None => "none",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted record, keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    /// Raw size metric, before min-max normalization
    pub size: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Source metrics kept for tooltips (e.g. `HC`, `CONS`, `affinity`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atp_kind: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl DataPoint {
    pub fn new<S: Into<PointId>>(id: S, x: f64, y: f64, size: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            size,
            category: Category::None,
            visible: true,
            metrics: BTreeMap::new(),
            atp_kind: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_metric<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// True when both coordinates can be placed on a chart
    pub fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A visible point with its size scaled into the render interval.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint<'a> {
    pub point: &'a DataPoint,
    pub render_size: f64,
}

impl NormalizedPoint<'_> {
    pub fn id(&self) -> &str {
        &self.point.id
    }

    pub fn center(&self) -> (f64, f64) {
        (self.point.x, self.point.y)
    }
}

/// Unordered pair of colliding points, stored with `a < b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlapPair {
    pub a: PointId,
    pub b: PointId,
}

impl OverlapPair {
    /// Build the canonical pair. Returns `None` for a point paired with itself.
    pub fn new(first: &str, second: &str) -> Option<Self> {
        match first.cmp(second) {
            std::cmp::Ordering::Less => Some(Self { a: first.to_string(), b: second.to_string() }),
            std::cmp::Ordering::Greater => Some(Self { a: second.to_string(), b: first.to_string() }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }
}

/// Label displacement from the point center in pixels. Negative `dy` is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
    #[serde(default)]
    pub is_manual: bool,
}

impl LabelOffset {
    pub fn computed(dx: f64, dy: f64) -> Self {
        Self { dx, dy, is_manual: false }
    }

    pub fn manual(dx: f64, dy: f64) -> Self {
        Self { dx, dy, is_manual: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelState {
    #[default]
    Default,
    Displaced,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPosition {
    pub point_id: PointId,
    pub offset: LabelOffset,
    pub state: LabelState,
}

/// Pointer position reported by the UI, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_pair_is_canonical() {
        let ab = OverlapPair::new("alpha", "beta").unwrap();
        let ba = OverlapPair::new("beta", "alpha").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.a, "alpha");
        assert!(ab.contains("beta"));
        assert!(OverlapPair::new("alpha", "alpha").is_none());
    }

    #[test]
    fn test_data_point_serializes_camel_case() {
        let point = DataPoint::new("Radio", 12.0, 30.0, 55.0).with_category(Category::Offline);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"category\":\"offline\""));
        assert!(!json.contains("metrics"));

        let back: DataPoint = serde_json::from_str(r#"{"id":"TV","x":1,"y":2,"size":3}"#).unwrap();
        assert!(back.visible);
        assert_eq!(back.category, Category::None);
    }

    #[test]
    fn test_label_offset_json() {
        let offset = LabelOffset::manual(4.0, -2.5);
        let json = serde_json::to_string(&offset).unwrap();
        assert_eq!(json, r#"{"dx":4.0,"dy":-2.5,"isManual":true}"#);
    }
}
