//! Axis domains, ticks and quadrant reference lines.

use crate::config::{AxisRule, ReferenceRule};
use serde::{Deserialize, Serialize};

/// Domain of one axis over the given values.
///
/// Non-finite values are ignored. With nothing to show the axis spans one
/// grid step from its origin.
pub fn axis_domain<I>(values: I, rule: &AxisRule) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let Some((min, max)) = finite_extent(values) else {
        return (rule.origin, rule.origin + rule.grid);
    };

    let lower = if min < rule.origin {
        ((min - rule.margin) / rule.grid).floor() * rule.grid
    } else {
        rule.origin
    };
    let upper = (max / rule.grid).ceil() * rule.grid + rule.margin;
    (lower, upper.max(lower + rule.grid))
}

fn finite_extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Step of 1, 2, 5 or 10 times a power of ten giving roughly `target_count` intervals.
pub fn nice_step(min: f64, max: f64, target_count: usize) -> Option<f64> {
    let range = max - min;
    if !(range > 1e-10) || !range.is_finite() || target_count == 0 {
        return None;
    }
    let rough = range / target_count as f64;
    let mag = 10f64.powf(rough.log10().floor());
    let normalized = rough / mag;
    let step = if normalized < 1.5 {
        mag
    } else if normalized < 3.5 {
        mag * 2.0
    } else if normalized < 7.5 {
        mag * 5.0
    } else {
        mag * 10.0
    };
    Some(step)
}

/// Tick values inside `[min, max]` on a nice step.
pub fn nice_ticks(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    let Some(step) = nice_step(min, max, target_count) else {
        return Vec::new();
    };
    let first = (min / step - 0.01).ceil() as i64;
    let last = (max / step + 0.01).floor() as i64;
    // Multiply instead of accumulating so ticks stay on exact multiples
    (first..=last).map(|i| i as f64 * step).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Quadrant divider positions in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ReferenceLines {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ReferenceLines {
    pub fn compute(rule: &ReferenceRule, xs: &[f64], ys: &[f64]) -> Self {
        match *rule {
            ReferenceRule::Mean => Self { x: mean(xs), y: mean(ys) },
            ReferenceRule::Median { y_floor } => {
                let y = if ys.iter().all(|&y| y >= y_floor) {
                    median(ys)
                } else {
                    Some(y_floor)
                };
                Self { x: median(xs), y: if xs.is_empty() { None } else { y } }
            }
        }
    }
}

/// Everything the renderer draws behind the bubbles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Guides {
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub reference: ReferenceLines,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affinity_line: Option<f64>,
}
