//! Error types for extraction and drag handling

use thiserror::Error;

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractionError>;

/// Fatal extraction failures. A failed extraction exposes no partial records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("missing anchor cell at row {row}, column {column}")]
    MissingAnchorCell { row: usize, column: usize },

    #[error("no valid records found")]
    NoValidRecords,
}

impl ExtractionError {
    pub fn missing_anchor(row: usize, column: usize) -> Self {
        Self::MissingAnchorCell { row, column }
    }

    /// Single line shown to the user when a file cannot be used.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingAnchorCell { row, column } => format!(
                "The file has no target name in cell {}{}. Check that it is the expected export.",
                column_letter(*column),
                row + 1
            ),
            Self::NoValidRecords => {
                "No valid data was found in the file. Check the format.".to_string()
            }
        }
    }
}

/// Why a single record was skipped during a scan. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("record has an empty name")]
    EmptyName,

    #[error("metric {metric} is missing")]
    MissingMetric { metric: String },

    #[error("metric {metric} is not numeric: {value}")]
    InvalidMetricValue { metric: String, value: String },

    #[error("metric {metric} must be positive, got {value}")]
    NonPositive { metric: String, value: f64 },

    #[error("duplicate record name")]
    Duplicate,
}

/// Errors returned by the drag interface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("unknown point: {0}")]
    UnknownPoint(String),

    #[error("point is not visible: {0}")]
    HiddenPoint(String),
}

/// Layout parameters outside their usable range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} = {value} is out of range, expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl ConfigError {
    pub fn out_of_range(field: &'static str, value: f64, expected: &'static str) -> Self {
        Self::OutOfRange { field, value, expected }
    }
}

fn column_letter(column: usize) -> String {
    let mut n = column + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractionError::missing_anchor(4, 3);
        assert_eq!(err.to_string(), "missing anchor cell at row 4, column 3");
        assert_eq!(ExtractionError::NoValidRecords.to_string(), "no valid records found");
    }

    #[test]
    fn test_user_message_names_spreadsheet_cell() {
        let err = ExtractionError::missing_anchor(4, 3);
        assert!(err.user_message().contains("D5"));
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }
}
