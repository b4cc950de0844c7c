//! Error handling for the Bubblemap CLI

use bubblemap_core::ExtractionError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Bubblemap CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<ExtractionError> for CliError {
    fn from(err: ExtractionError) -> Self {
        Self::Extraction { message: err.user_message() }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    // Add helpful suggestions based on error type
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • The input must be a JSON array of rows, each an array of strings, numbers or nulls\n\
                 • Export the spreadsheet again if the file is truncated"
            );
        }

        CliError::Extraction { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that --kind matches the spreadsheet layout (media-box or affinity-map)\n\
                 • Run with --verbose to see which rows were skipped and why"
            );
        }

        CliError::Config { .. } | CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your bubblemap.toml configuration file\n\
                 • Use 'bubblemap config --example' to generate a sample configuration"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("grid.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_extraction_error_uses_user_message() {
        let err: CliError = ExtractionError::NoValidRecords.into();
        assert_eq!(
            err.to_string(),
            "Extraction failed: No valid data was found in the file. Check the format."
        );
        assert!(format_error_with_suggestions(&err).contains("--kind"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
