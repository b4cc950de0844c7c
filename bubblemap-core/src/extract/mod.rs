//! Record extraction from marker-driven spreadsheet grids
//!
//! The spreadsheet reader hands over a plain grid of cells. Each chart kind
//! has its own schema for finding records in it; both return either the full
//! record list or a single fatal error, never a partial result.

pub mod affinity;
pub mod classify;
pub mod grid;
pub mod markers;
pub mod media;

pub use grid::{Cell, Grid};
pub use markers::CellRef;

use crate::config::ChartKind;
use crate::error::{ExtractResult, ExtractionError, SkipReason};
use crate::types::DataPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Anchor cell holding the target name in both layouts ("D5").
pub const TARGET_ANCHOR: CellRef = CellRef::new(4, 3);

/// Complete result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub kind: ChartKind,
    pub target_name: String,
    pub points: Vec<DataPoint>,
}

/// Trait for extraction schemas
pub trait RecordExtractor {
    /// Scan the grid and assemble every valid record
    fn extract(&self, grid: &Grid) -> ExtractResult<Extraction>;

    /// Chart kind this schema feeds
    fn kind(&self) -> ChartKind;
}

/// Factory for creating extractors
pub struct ExtractorFactory;

impl ExtractorFactory {
    pub fn create(kind: ChartKind) -> Box<dyn RecordExtractor> {
        match kind {
            ChartKind::MediaBox => Box::new(media::MediaBoxExtractor::default()),
            ChartKind::AffinityMap => Box::new(affinity::AffinityMapExtractor::default()),
        }
    }
}

/// Extract records for `kind` with its default schema.
pub fn extract(grid: &Grid, kind: ChartKind) -> ExtractResult<Extraction> {
    ExtractorFactory::create(kind).extract(grid)
}

/// Collects accepted records, dropping duplicates and logging skipped rows.
#[derive(Debug, Default)]
pub(crate) struct RecordSink {
    points: Vec<DataPoint>,
    seen: HashSet<String>,
    skipped: usize,
}

impl RecordSink {
    pub(crate) fn accept(&mut self, row: usize, point: DataPoint) {
        if !self.seen.insert(point.id.clone()) {
            log::warn!("Row {}: duplicate record '{}' ignored", row, point.id);
            self.skip(row, &point.id, SkipReason::Duplicate);
            return;
        }
        self.points.push(point);
    }

    pub(crate) fn skip(&mut self, row: usize, name: &str, reason: SkipReason) {
        log::debug!("Row {}: skipping '{}': {}", row, name, reason);
        self.skipped += 1;
    }

    pub(crate) fn finish(self, kind: ChartKind, target_name: String) -> ExtractResult<Extraction> {
        if self.points.is_empty() {
            log::warn!("No valid records for target '{}' ({} rows skipped)", target_name, self.skipped);
            return Err(ExtractionError::NoValidRecords);
        }
        log::info!(
            "Extracted {} records for target '{}' ({} skipped)",
            self.points.len(),
            target_name,
            self.skipped
        );
        Ok(Extraction { kind, target_name, points: self.points })
    }
}
