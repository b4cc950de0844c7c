//! Stateful chart: the loaded records plus everything the user changes.
//!
//! Every mutation invalidates the cached layout; [`BubbleChart::layout`]
//! recomputes it on demand.

use crate::config::{ChartKind, LayoutConfig, Viewport};
use crate::drag::{DragGesture, Subscription};
use crate::error::DragError;
use crate::extract::Extraction;
use crate::layout::{recompute, Layout, LayoutOptions};
use crate::types::{Category, DataPoint, LabelOffset, PointId, Pointer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Which media categories are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Online,
    Offline,
}

impl CategoryFilter {
    pub fn admits(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Online => category == Category::Online,
            CategoryFilter::Offline => category == Category::Offline,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "todos" => Ok(CategoryFilter::All),
            "online" => Ok(CategoryFilter::Online),
            "offline" => Ok(CategoryFilter::Offline),
            other => Err(format!("unknown category filter: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    X,
    Y,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(SortKey::X),
            "y" => Ok(SortKey::Y),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Keep only the `n` largest points by `sort_by`, among those otherwise shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopN {
    pub n: usize,
    pub sort_by: SortKey,
}

impl TopN {
    pub fn new(n: usize, sort_by: SortKey) -> Self {
        Self { n, sort_by }
    }
}

#[derive(Debug, Default)]
pub struct BubbleChart {
    kind: Option<ChartKind>,
    target_name: Option<String>,
    points: Vec<DataPoint>,
    overrides: BTreeMap<PointId, LabelOffset>,
    gesture: DragGesture,
    config: LayoutConfig,
    filter: CategoryFilter,
    top_n: Option<TopN>,
    highlight: Option<PointId>,
    affinity_line: Option<f64>,
    cached: Option<Layout>,
}

impl BubbleChart {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, ..Default::default() }
    }

    /// Chart using the preset of `kind`
    pub fn for_kind(kind: ChartKind) -> Self {
        Self::new(LayoutConfig::for_kind(kind))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn kind(&self) -> Option<ChartKind> {
        self.kind
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Replace the whole data set. Manual offsets and any drag in progress are discarded.
    /// A repeated id keeps its first point.
    pub fn load(&mut self, extraction: Extraction) {
        log::info!(
            "Loading {} points for target '{}'",
            extraction.points.len(),
            extraction.target_name
        );
        self.gesture.end();
        self.overrides.clear();
        self.highlight = None;
        self.kind = Some(extraction.kind);
        self.target_name = Some(extraction.target_name);
        let mut seen = HashSet::new();
        self.points = extraction
            .points
            .into_iter()
            .filter(|p| {
                let first = seen.insert(p.id.clone());
                if !first {
                    log::warn!("Duplicate point '{}' ignored", p.id);
                }
                first
            })
            .collect();
        self.invalidate();
    }

    pub fn clear(&mut self) {
        self.gesture.end();
        self.overrides.clear();
        self.points.clear();
        self.kind = None;
        self.target_name = None;
        self.highlight = None;
        self.invalidate();
    }

    /// Flip the user visibility of one point. Returns the new state, or `None` for an unknown id.
    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        let point = self.points.iter_mut().find(|p| p.id == id)?;
        point.visible = !point.visible;
        let visible = point.visible;
        log::debug!("Point '{}' visible: {}", id, visible);
        self.after_visibility_change();
        Some(visible)
    }

    pub fn set_all_visible(&mut self, visible: bool) {
        for point in &mut self.points {
            point.visible = visible;
        }
        self.after_visibility_change();
    }

    /// Hide everything when all points are shown, otherwise show everything.
    pub fn toggle_all(&mut self) {
        let all_visible = self.points.iter().all(|p| p.visible);
        self.set_all_visible(!all_visible);
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.after_visibility_change();
    }

    pub fn set_top_n(&mut self, top_n: Option<TopN>) {
        self.top_n = top_n;
        self.after_visibility_change();
    }

    /// Highlight one point. Unknown or hidden points clear the highlight.
    pub fn set_highlight(&mut self, id: Option<&str>) {
        self.highlight = id
            .filter(|id| self.effective_visible_ids().contains(*id))
            .map(str::to_string);
        self.invalidate();
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        self.invalidate();
    }

    pub fn set_affinity_line(&mut self, value: Option<f64>) {
        self.affinity_line = value.filter(|v| v.is_finite());
        self.invalidate();
    }

    fn after_visibility_change(&mut self) {
        if let Some(id) = self.highlight.clone() {
            if !self.effective_visible_ids().contains(id.as_str()) {
                log::debug!("Clearing highlight of hidden point '{}'", id);
                self.highlight = None;
            }
        }
        self.invalidate();
    }

    /// Ids shown after user toggles, the category filter and top-N.
    fn effective_visible_ids(&self) -> HashSet<&str> {
        let mut candidates: Vec<&DataPoint> = self
            .points
            .iter()
            .filter(|p| p.visible && self.filter.admits(p.category))
            .collect();
        if let Some(TopN { n, sort_by }) = self.top_n {
            let key = |p: &DataPoint| match sort_by {
                SortKey::X => p.x,
                SortKey::Y => p.y,
            };
            // Stable sort keeps input order among equal keys
            candidates.sort_by(|a, b| key(*b).total_cmp(&key(*a)));
            candidates.truncate(n);
        }
        candidates.into_iter().map(|p| p.id.as_str()).collect()
    }

    fn effective_points(&self) -> Vec<DataPoint> {
        let shown = self.effective_visible_ids();
        self.points
            .iter()
            .map(|p| {
                let mut point = p.clone();
                point.visible = shown.contains(p.id.as_str());
                point
            })
            .collect()
    }

    /// Current layout, recomputed if anything changed since the last call.
    pub fn layout(&mut self) -> &Layout {
        if self.cached.is_none() {
            let options = LayoutOptions {
                highlight: self.highlight.clone(),
                affinity_line: self.affinity_line,
            };
            let layout = recompute(&self.effective_points(), &self.overrides, &self.config, &options);
            self.cached = Some(layout);
        }
        self.cached.get_or_insert_with(Layout::default)
    }

    pub fn manual_offsets(&self) -> &BTreeMap<PointId, LabelOffset> {
        &self.overrides
    }

    /// Restore manual offsets saved from an earlier session. Unknown ids are ignored.
    pub fn set_manual_offsets(&mut self, offsets: BTreeMap<PointId, LabelOffset>) {
        let known: HashSet<&str> = self.points.iter().map(|p| p.id.as_str()).collect();
        self.overrides = offsets
            .into_iter()
            .filter(|(id, _)| known.contains(id.as_str()))
            .map(|(id, o)| (id, LabelOffset::manual(o.dx, o.dy)))
            .collect();
        self.invalidate();
    }

    pub fn reset_all_manual_offsets(&mut self) {
        log::info!("Resetting {} manual label offsets", self.overrides.len());
        self.overrides.clear();
        self.invalidate();
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Start dragging the label of `id` with no listener registration.
    pub fn begin_drag(&mut self, id: &str, pointer: Pointer) -> Result<(), DragError> {
        self.begin_drag_scoped(id, pointer, Subscription::none())
    }

    /// Start dragging the label of `id`. The gesture owns `subscription`
    /// until it ends or is replaced.
    pub fn begin_drag_scoped(
        &mut self,
        id: &str,
        pointer: Pointer,
        subscription: Subscription,
    ) -> Result<(), DragError> {
        if !self.points.iter().any(|p| p.id == id) {
            return Err(DragError::UnknownPoint(id.to_string()));
        }
        let offset_start = match self.layout().point(id) {
            Some(p) if p.visible => p.label_offset,
            _ => return Err(DragError::HiddenPoint(id.to_string())),
        };
        log::debug!("Begin drag of '{}' at ({}, {})", id, pointer.x, pointer.y);
        // Assigning drops the previous gesture and its subscription
        self.gesture = DragGesture::begin(id.to_string(), pointer, offset_start, subscription);
        Ok(())
    }

    /// Move the dragged label. Returns the new manual offset, or `None` when
    /// idle or the pointer has not moved.
    pub fn update_drag(&mut self, pointer: Pointer) -> Option<LabelOffset> {
        let (id, offset) = self.gesture.offset_at(pointer)?;
        let id = id.to_string();
        self.overrides.insert(id, offset);
        self.invalidate();
        Some(offset)
    }

    /// Finish the gesture. The last offset stays as the manual position.
    pub fn end_drag(&mut self) -> Option<PointId> {
        let ended = self.gesture.end();
        if let Some(id) = &ended {
            log::debug!("End drag of '{}'", id);
        }
        ended
    }
}
