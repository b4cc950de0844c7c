//! Marker-row scanning primitives shared by the extraction schemas.

use super::grid::{Cell, Grid};
use crate::error::{ExtractResult, ExtractionError, SkipReason};

/// Fixed cell position, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Read the dataset label from its anchor cell.
pub fn read_anchor(grid: &Grid, anchor: CellRef) -> ExtractResult<String> {
    grid.cell(anchor.row, anchor.column)
        .and_then(|cell| cell.display())
        .ok_or_else(|| ExtractionError::missing_anchor(anchor.row, anchor.column))
}

/// Rows whose `column` cell, trimmed, equals `tag`, starting at `from_row`.
pub fn tagged_rows<'g>(
    grid: &'g Grid,
    column: usize,
    tag: &'g str,
    from_row: usize,
) -> impl Iterator<Item = usize> + 'g {
    grid.rows()
        .skip(from_row)
        .filter(move |(_, row)| row.get(column).and_then(|c| c.as_text()) == Some(tag))
        .map(|(i, _)| i)
}

/// A row labelled `<prefix><name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixedRow {
    pub row: usize,
    pub name: String,
}

/// Rows whose label cell starts with `prefix`, paired with the trimmed remainder.
///
/// The prefix is matched against the raw label, so a bare `"HC "` row comes
/// back with an empty name for the caller to report. Matching is
/// case-sensitive unless `ignore_case` is set.
pub fn prefixed_rows(grid: &Grid, column: usize, prefix: &str, ignore_case: bool) -> Vec<PrefixedRow> {
    let mut found = Vec::new();
    for (i, row) in grid.rows() {
        let Some(Cell::Text(label)) = row.get(column) else {
            continue;
        };
        if let Some(rest) = strip_prefix(label, prefix, ignore_case) {
            found.push(PrefixedRow { row: i, name: rest.trim().to_string() });
        }
    }
    found
}

/// Rows whose trimmed label is exactly `<prefix><name>`.
///
/// Only the ends of the label are trimmed; spacing between the prefix and the
/// name is kept, so `"CONS   Radio"` does not name `"Radio"`.
pub fn exact_prefixed_rows(grid: &Grid, column: usize, prefix: &str) -> Vec<PrefixedRow> {
    grid.rows()
        .filter_map(|(i, row)| {
            let label = row.get(column).and_then(|c| c.as_text())?;
            let name = label.strip_prefix(prefix)?;
            Some(PrefixedRow { row: i, name: name.to_string() })
        })
        .collect()
}

fn strip_prefix<'a>(label: &'a str, prefix: &str, ignore_case: bool) -> Option<&'a str> {
    if !ignore_case {
        return label.strip_prefix(prefix);
    }
    let head = label.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &label[prefix.len()..])
}

/// Numeric metric at `(row, column)`, or the reason it cannot be used.
pub fn read_metric(grid: &Grid, row: usize, column: usize, metric: &str) -> Result<f64, SkipReason> {
    let cell = grid
        .cell(row, column)
        .filter(|c| !c.is_blank())
        .ok_or_else(|| SkipReason::MissingMetric { metric: metric.to_string() })?;
    cell.as_number().ok_or_else(|| SkipReason::InvalidMetricValue {
        metric: metric.to_string(),
        value: cell.display().unwrap_or_default(),
    })
}
