//! Rectangular cell grid as produced by the spreadsheet reader.

use serde::{Deserialize, Serialize};

/// One spreadsheet cell: a number, a string or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn text<S: Into<String>>(value: S) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => !n.is_finite(),
        }
    }

    /// Trimmed string content. Numbers are not converted.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.trim()),
            _ => None,
        }
    }

    /// Display form of the cell, used for names and anchors.
    pub fn display(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric value of the cell.
    ///
    /// Text is trimmed; a trailing `%` divides by 100 so `"48.1%"` reads as `0.481`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => {
                let s = s.trim();
                let value = match s.strip_suffix('%') {
                    Some(body) => body.trim().parse::<f64>().ok()? / 100.0,
                    None => s.parse::<f64>().ok()?,
                };
                value.is_finite().then_some(value)
            }
            _ => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Empty)
    }
}

/// 0-indexed rows of cells. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows.iter().enumerate().map(|(i, row)| (i, row.as_slice()))
    }

    /// Cell at `(row, column)`; out-of-range positions read as `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn text(&self, row: usize, column: usize) -> Option<&str> {
        self.cell(row, column).and_then(Cell::as_text)
    }

    pub fn number(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column).and_then(Cell::as_number)
    }
}
