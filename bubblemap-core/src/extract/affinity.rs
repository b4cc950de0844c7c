//! Affinity-map schema: tagged row pairs.
//!
//! Each variable occupies two consecutive rows. The first carries the
//! primary tag (`Vert%`) in the tag column and the consumption value; the
//! second carries the dependent tag (`Afinidad`) and the affinity index.

use super::grid::Grid;
use super::markers::{self, CellRef};
use super::{Extraction, RecordExtractor, RecordSink, TARGET_ANCHOR};
use crate::config::ChartKind;
use crate::error::{ExtractResult, SkipReason};
use crate::normalize::as_percent;
use crate::types::DataPoint;

/// Column and tag layout of the tagged schema
#[derive(Debug, Clone)]
pub struct TaggedSchema {
    pub anchor: CellRef,
    pub first_data_row: usize,
    pub name_column: usize,
    pub tag_column: usize,
    pub value_column: usize,
    pub primary_tag: String,
    pub dependent_tag: String,
}

impl Default for TaggedSchema {
    fn default() -> Self {
        Self {
            anchor: TARGET_ANCHOR,
            first_data_row: 7,
            name_column: 0,
            tag_column: 1,
            value_column: 3,
            primary_tag: "Vert%".to_string(),
            dependent_tag: "Afinidad".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AffinityMapExtractor {
    schema: TaggedSchema,
}

impl AffinityMapExtractor {
    pub fn new(schema: TaggedSchema) -> Self {
        Self { schema }
    }

    fn has_tag(&self, grid: &Grid, row: usize, tag: &str) -> bool {
        grid.text(row, self.schema.tag_column) == Some(tag)
    }

    fn read_record(&self, grid: &Grid, row: usize) -> Result<DataPoint, SkipReason> {
        let s = &self.schema;
        let name = grid
            .cell(row, s.name_column)
            .and_then(|c| c.display())
            .ok_or(SkipReason::EmptyName)?;
        let consumption = markers::read_metric(grid, row, s.value_column, "consumption")?;
        let affinity = markers::read_metric(grid, row + 1, s.value_column, "affinity")?;
        if consumption <= 0.0 {
            return Err(SkipReason::NonPositive { metric: "consumption".to_string(), value: consumption });
        }

        let consumption = as_percent(consumption);
        Ok(DataPoint::new(name, consumption, affinity, consumption)
            .with_metric("consumption", consumption)
            .with_metric("affinity", affinity))
    }
}

impl RecordExtractor for AffinityMapExtractor {
    fn extract(&self, grid: &Grid) -> ExtractResult<Extraction> {
        let target_name = markers::read_anchor(grid, self.schema.anchor)?;
        log::info!("Scanning affinity rows for target '{}'", target_name);

        let s = &self.schema;
        let mut sink = RecordSink::default();
        for row in markers::tagged_rows(grid, s.tag_column, &s.primary_tag, s.first_data_row) {
            let name = grid.text(row, s.name_column).unwrap_or_default();
            if !self.has_tag(grid, row + 1, &s.dependent_tag) {
                sink.skip(row, name, SkipReason::MissingMetric { metric: "affinity".to_string() });
                continue;
            }
            match self.read_record(grid, row) {
                Ok(point) => sink.accept(row, point),
                Err(reason) => sink.skip(row, name, reason),
            }
        }

        sink.finish(ChartKind::AffinityMap, target_name)
    }

    fn kind(&self) -> ChartKind {
        ChartKind::AffinityMap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::grid::Cell;

    fn header(target: Cell) -> Vec<Vec<Cell>> {
        vec![
            vec![Cell::text("Nuevo Informe")],
            vec![Cell::text("meta")],
            vec![Cell::text("Base")],
            vec![],
            vec![Cell::Empty, Cell::text("Elementos"), Cell::text("TOTAL"), target],
            vec![Cell::Empty, Cell::text("Vert%"), Cell::text("100.0%"), Cell::text("100.0%")],
            vec![Cell::Empty, Cell::text("Afinidad"), Cell::Number(100.0), Cell::Number(100.0)],
        ]
    }

    fn pair(name: &str, vert: Cell, affinity: Cell) -> [Vec<Cell>; 2] {
        [
            vec![Cell::text(name), Cell::text("Vert%"), Cell::Empty, vert],
            vec![Cell::Empty, Cell::text("Afinidad"), Cell::Empty, affinity],
        ]
    }

    #[test]
    fn test_extracts_pairs() {
        let mut rows = header(Cell::text("Mujeres 25-34"));
        rows.extend(pair("Netflix", Cell::text("48.1%"), Cell::Number(133.0)));
        rows.extend(pair("Cine", Cell::Number(0.12), Cell::text("90")));
        let extraction = AffinityMapExtractor::default().extract(&Grid::new(rows)).unwrap();

        assert_eq!(extraction.target_name, "Mujeres 25-34");
        assert_eq!(extraction.points.len(), 2);
        let netflix = &extraction.points[0];
        assert_eq!(netflix.id, "Netflix");
        assert!((netflix.x - 48.1).abs() < 1e-9);
        assert_eq!(netflix.y, 133.0);
        assert_eq!(netflix.size, netflix.x);
        assert_eq!(extraction.points[1].x, 12.0);
        assert_eq!(extraction.points[1].y, 90.0);
    }

    #[test]
    fn test_skips_invalid_and_non_positive() {
        let mut rows = header(Cell::text("T"));
        rows.extend(pair("Bad", Cell::text("abc"), Cell::Number(120.0)));
        rows.extend(pair("Zero", Cell::Number(0.0), Cell::Number(120.0)));
        rows.extend(pair("", Cell::Number(0.2), Cell::Number(120.0)));
        rows.extend(pair("Good", Cell::Number(0.2), Cell::Number(120.0)));
        let extraction = AffinityMapExtractor::default().extract(&Grid::new(rows)).unwrap();
        let ids: Vec<_> = extraction.points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Good"]);
    }

    #[test]
    fn test_unpaired_tag_is_skipped() {
        let mut rows = header(Cell::text("T"));
        rows.push(vec![Cell::text("Orphan"), Cell::text("Vert%"), Cell::Empty, Cell::Number(0.3)]);
        rows.push(vec![Cell::text("Other"), Cell::text("Horz%"), Cell::Empty, Cell::Number(1.0)]);
        let result = AffinityMapExtractor::default().extract(&Grid::new(rows));
        assert_eq!(result, Err(ExtractionError::NoValidRecords));
    }

    #[test]
    fn test_baseline_rows_are_not_records() {
        // Rows 5-6 hold the TOTAL baseline and sit before the first data row
        let rows = header(Cell::text("T"));
        let result = AffinityMapExtractor::default().extract(&Grid::new(rows));
        assert_eq!(result, Err(ExtractionError::NoValidRecords));
    }

    #[test]
    fn test_custom_tags_and_value_column() {
        let schema = TaggedSchema {
            value_column: 2,
            primary_tag: "Share".to_string(),
            dependent_tag: "Index".to_string(),
            ..TaggedSchema::default()
        };
        let mut rows = header(Cell::text("Adults"));
        rows.push(vec![Cell::text("Radio"), Cell::text("Share"), Cell::Number(0.3)]);
        rows.push(vec![Cell::Empty, Cell::text("Index"), Cell::Number(110.0)]);
        rows.extend(pair("Netflix", Cell::Number(0.5), Cell::Number(133.0)));

        let extraction = AffinityMapExtractor::new(schema).extract(&Grid::new(rows)).unwrap();
        assert_eq!(extraction.points.len(), 1);
        assert_eq!(extraction.points[0].id, "Radio");
        assert_eq!((extraction.points[0].x, extraction.points[0].y), (30.0, 110.0));
    }
}
