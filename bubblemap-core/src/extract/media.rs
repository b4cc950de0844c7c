//! Media-box schema: prefix rows joined by outlet name.
//!
//! `HC <name>` rows hold the high-consumer share, with the affinity index on
//! the row right below. `CONS <name>` rows hold consumption and may appear
//! anywhere. `ATP <kind>` rows hold the reach index of a media family.

use super::classify::{classify_media, default_reach, AtpKind};
use super::grid::Grid;
use super::markers::{self, CellRef, PrefixedRow};
use super::{Extraction, RecordExtractor, RecordSink, TARGET_ANCHOR};
use crate::config::ChartKind;
use crate::error::{ExtractResult, SkipReason};
use crate::normalize::as_percent;
use crate::types::DataPoint;
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Weight of the reach index in the bubble size; affinity takes the rest.
pub const ATP_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct PrefixSchema {
    pub anchor: CellRef,
    pub label_column: usize,
    pub value_column: usize,
    pub hc_prefix: String,
    pub cons_prefix: String,
    pub atp_prefix: String,
}

impl Default for PrefixSchema {
    fn default() -> Self {
        Self {
            anchor: TARGET_ANCHOR,
            label_column: 0,
            value_column: 3,
            hc_prefix: "HC ".to_string(),
            cons_prefix: "CONS ".to_string(),
            atp_prefix: "ATP ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MediaBoxExtractor {
    schema: PrefixSchema,
}

impl MediaBoxExtractor {
    pub fn new(schema: PrefixSchema) -> Self {
        Self { schema }
    }

    /// Reach indexes keyed by lower-cased kind label. First row wins.
    fn reach_table(&self, grid: &Grid) -> HashMap<String, f64> {
        let s = &self.schema;
        let mut table = HashMap::new();
        for PrefixedRow { row, name } in markers::prefixed_rows(grid, s.label_column, &s.atp_prefix, true) {
            match markers::read_metric(grid, row, s.value_column, "ATP") {
                Ok(value) => {
                    table.entry(name.to_lowercase()).or_insert(value);
                }
                Err(reason) => log::debug!("Row {}: ignoring ATP '{}': {}", row, name, reason),
            }
        }
        log::debug!("Found {} ATP rows", table.len());
        table
    }

    fn read_record(
        &self,
        grid: &Grid,
        hc: &PrefixedRow,
        cons_rows: &HashMap<&str, usize>,
        reach: &HashMap<String, f64>,
    ) -> Result<DataPoint, SkipReason> {
        let s = &self.schema;
        if hc.name.is_empty() {
            return Err(SkipReason::EmptyName);
        }
        let hc_value = markers::read_metric(grid, hc.row, s.value_column, "HC")?;
        let affinity = markers::read_metric(grid, hc.row + 1, s.value_column, "affinity")?;
        let cons_row = cons_rows
            .get(hc.name.as_str())
            .copied()
            .ok_or_else(|| SkipReason::MissingMetric { metric: "CONS".to_string() })?;
        let cons_value = markers::read_metric(grid, cons_row, s.value_column, "CONS")?;

        let category = classify_media(&hc.name);
        let atp_kind = AtpKind::for_media(&hc.name);
        let atp = match atp_kind.and_then(|k| reach.get(&k.label().to_lowercase())) {
            Some(&value) => as_percent(value),
            None => {
                log::debug!("Using default ATP for '{}'", hc.name);
                default_reach(atp_kind, category)
            }
        };
        let size = ATP_WEIGHT * atp + (1.0 - ATP_WEIGHT) * affinity;

        let cons = as_percent(cons_value);
        let hc_pct = as_percent(hc_value);
        let mut point = DataPoint::new(hc.name.clone(), cons, hc_pct, size)
            .with_category(category)
            .with_metric("CONS", cons)
            .with_metric("HC", hc_pct)
            .with_metric("affinity", affinity)
            .with_metric("ATP", atp);
        point.atp_kind = atp_kind.map(|k| k.label().to_string());
        Ok(point)
    }
}

impl RecordExtractor for MediaBoxExtractor {
    fn extract(&self, grid: &Grid) -> ExtractResult<Extraction> {
        let s = &self.schema;
        let target_name = markers::read_anchor(grid, s.anchor)?;
        log::info!("Scanning media rows for target '{}'", target_name);

        let reach = self.reach_table(grid);
        let cons = markers::exact_prefixed_rows(grid, s.label_column, &s.cons_prefix);
        let mut cons_rows: HashMap<&str, usize> = HashMap::new();
        for entry in &cons {
            cons_rows.entry(entry.name.as_str()).or_insert(entry.row);
        }

        let hc_rows = markers::prefixed_rows(grid, s.label_column, &s.hc_prefix, false);
        let mut sink = RecordSink::default();
        for hc in &hc_rows {
            match self.read_record(grid, hc, &cons_rows, &reach) {
                Ok(point) => sink.accept(hc.row, point),
                Err(reason) => sink.skip(hc.row, &hc.name, reason),
            }
        }
        for entry in cons.iter().filter(|c| !hc_rows.iter().any(|h| h.name == c.name)) {
            sink.skip(entry.row, &entry.name, SkipReason::MissingMetric { metric: "HC".to_string() });
        }

        let mut extraction = sink.finish(ChartKind::MediaBox, target_name)?;
        extraction.points.sort_by(|a, b| compare_names(&a.id, &b.id));
        Ok(extraction)
    }

    fn kind(&self) -> ChartKind {
        ChartKind::MediaBox
    }
}

/// Name order ignoring case and accents; ties put the unaccented, then the lower-case form first.
fn compare_names(a: &str, b: &str) -> Ordering {
    folded(a)
        .cmp(&folded(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn folded(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extract::grid::Cell;
    use crate::types::Category;

    fn row(label: &str, value: Cell) -> Vec<Cell> {
        vec![Cell::text(label), Cell::Empty, Cell::Empty, value]
    }

    fn base() -> Vec<Vec<Cell>> {
        let mut rows = vec![Vec::new(); 4];
        rows.push(vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::text("Target A")]);
        rows
    }

    #[test]
    fn test_joins_prefix_rows_in_any_order() {
        let mut rows = base();
        rows.push(row("CONS Radio AM", Cell::Number(0.42)));
        rows.push(row("HC Radio AM", Cell::Number(0.31)));
        rows.push(row("", Cell::Number(120.0)));
        rows.push(row("HC Instagram", Cell::Number(0.25)));
        rows.push(row("", Cell::Number(140.0)));
        rows.push(row("CONS Instagram", Cell::Number(0.65)));
        rows.push(row("ATP Internet Social Media", Cell::Number(50.0)));

        let extraction = MediaBoxExtractor::default().extract(&Grid::new(rows)).unwrap();
        assert_eq!(extraction.target_name, "Target A");
        let ids: Vec<_> = extraction.points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Instagram", "Radio AM"]);

        let insta = &extraction.points[0];
        assert_eq!(insta.category, Category::Online);
        assert_eq!(insta.x, 65.0);
        assert_eq!(insta.y, 25.0);
        assert!((insta.size - (0.4 * 50.0 + 0.6 * 140.0)).abs() < 1e-9);
        assert_eq!(insta.atp_kind.as_deref(), Some("Internet Social Media"));

        let radio = &extraction.points[1];
        assert_eq!(radio.category, Category::Offline);
        assert_eq!(radio.x, 42.0);
        assert_eq!(radio.y, 31.0);
        // No "ATP Radio" row: falls back to the offline default
        assert!((radio.size - (0.4 * 27.35 + 0.6 * 120.0)).abs() < 1e-9);
        assert_eq!(radio.metrics["affinity"], 120.0);
    }

    #[test]
    fn test_record_without_cons_is_dropped() {
        let mut rows = base();
        rows.push(row("HC Cine", Cell::Number(0.2)));
        rows.push(row("", Cell::Number(100.0)));
        rows.push(row("HC Diario papel", Cell::Number(0.1)));
        rows.push(row("", Cell::text("n/a")));
        rows.push(row("CONS Diario papel", Cell::Number(0.3)));
        rows.push(row("CONS Revistas", Cell::Number(0.3)));
        let result = MediaBoxExtractor::default().extract(&Grid::new(rows));
        assert_eq!(result, Err(ExtractionError::NoValidRecords));
    }

    #[test]
    fn test_atp_rows_match_case_insensitively() {
        let mut rows = base();
        rows.push(row("atp tv GENERAL", Cell::Number(0.5)));
        rows.push(row("HC TV Paga", Cell::Number(0.2)));
        rows.push(row("", Cell::Number(110.0)));
        rows.push(row("CONS TV Paga", Cell::Number(0.4)));
        let extraction = MediaBoxExtractor::default().extract(&Grid::new(rows)).unwrap();
        let tv = &extraction.points[0];
        assert_eq!(tv.metrics["ATP"], 50.0);
        assert!((tv.size - (0.4 * 50.0 + 0.6 * 110.0)).abs() < 1e-9);
    }

    fn record(name: &str) -> Vec<Vec<Cell>> {
        vec![
            row(&format!("HC {}", name), Cell::Number(0.2)),
            row("", Cell::Number(100.0)),
            row(&format!("CONS {}", name), Cell::Number(0.3)),
        ]
    }

    #[test]
    fn test_points_sorted_ignoring_case_and_accents() {
        let mut rows = base();
        for name in ["Spotify", "radio", "Ópera", "Ñandú TV", "Noticias"] {
            rows.extend(record(name));
        }
        let extraction = MediaBoxExtractor::default().extract(&Grid::new(rows)).unwrap();
        let ids: Vec<_> = extraction.points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Ñandú TV", "Noticias", "Ópera", "radio", "Spotify"]);
    }

    #[test]
    fn test_name_ties_order() {
        assert_eq!(compare_names("radio", "Radio"), Ordering::Less);
        assert_eq!(compare_names("opera", "Ópera"), Ordering::Less);
        assert_eq!(compare_names("Radio", "Radio"), Ordering::Equal);
    }

    #[test]
    fn test_bare_hc_label_is_an_empty_name() {
        let mut rows = base();
        rows.push(row("HC ", Cell::Number(0.2)));
        rows.push(row("", Cell::Number(100.0)));
        rows.extend(record("Cine"));
        let grid = Grid::new(rows);

        let extractor = MediaBoxExtractor::default();
        let bare = PrefixedRow { row: 5, name: String::new() };
        let reason = extractor.read_record(&grid, &bare, &HashMap::new(), &HashMap::new()).unwrap_err();
        assert_eq!(reason, SkipReason::EmptyName);

        let extraction = extractor.extract(&grid).unwrap();
        let ids: Vec<_> = extraction.points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Cine"]);
    }

    #[test]
    fn test_cons_name_must_match_exactly() {
        let mut rows = base();
        rows.push(row("HC Radio", Cell::Number(0.2)));
        rows.push(row("", Cell::Number(100.0)));
        rows.push(row("CONS   Radio", Cell::Number(0.3)));
        let result = MediaBoxExtractor::default().extract(&Grid::new(rows.clone()));
        assert_eq!(result, Err(ExtractionError::NoValidRecords));

        rows.push(row("  CONS Radio ", Cell::Number(0.3)));
        let extraction = MediaBoxExtractor::default().extract(&Grid::new(rows)).unwrap();
        assert_eq!(extraction.points[0].x, 30.0);
    }

    #[test]
    fn test_custom_value_column() {
        let schema = PrefixSchema { value_column: 1, ..PrefixSchema::default() };
        let mut rows = base();
        rows.push(vec![Cell::text("HC Cine"), Cell::Number(0.2)]);
        rows.push(vec![Cell::Empty, Cell::Number(100.0)]);
        rows.push(vec![Cell::text("CONS Cine"), Cell::Number(0.42)]);

        let extraction = MediaBoxExtractor::new(schema).extract(&Grid::new(rows)).unwrap();
        let cine = &extraction.points[0];
        assert_eq!((cine.x, cine.y), (42.0, 20.0));
        assert_eq!(cine.metrics["affinity"], 100.0);
    }
}
