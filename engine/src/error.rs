use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read '{}': {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No data found in file")]
    EmptyInput,

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Export error: {source}")]
    Export {
        #[from]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Nothing to export for {0}")]
    NothingToExport(shared::models::ReportKind),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("No record with id '{0}'")]
    RecordNotFound(String),
}

impl From<calamine::Error> for EngineError {
    fn from(err: calamine::Error) -> Self {
        EngineError::Spreadsheet(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// User-visible outcome of an operation; what the front end shows as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&EngineError> for Notice {
    fn from(err: &EngineError) -> Self {
        tracing::warn!("Reporting EngineError as notice: {:?}", err);
        match err {
            EngineError::UnreadableFile { .. } => {
                Notice::error("Error reading file", "Failed to read the file")
            }
            EngineError::IoError { source } => Notice::error("File system error", source.to_string()),
            EngineError::EmptyInput => {
                Notice::error("No data found", "The file does not contain any data rows")
            }
            EngineError::CsvSystemError { .. }
            | EngineError::Spreadsheet(_) => Notice::error(
                "Error processing file",
                "Please ensure your file contains valid report data",
            ),
            EngineError::NothingToExport(_) => Notice::error(
                "No data to export",
                "Please load and analyze data before exporting",
            ),
            EngineError::Export { .. } => {
                Notice::error("Export failed", "An error occurred while exporting the data")
            }
            EngineError::InvalidNumber(value) => {
                Notice::error("Invalid target ACOS", format!("'{}' is not a number", value))
            }
            EngineError::RecordNotFound(id) => {
                Notice::error("Unknown row", format!("No row with id '{}'", id))
            }
            EngineError::ConfigError(msg) => Notice::error("Configuration error", msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReportKind;

    #[test]
    fn test_notice_for_empty_input() {
        let notice = Notice::from(&EngineError::EmptyInput);
        assert!(notice.is_error());
        assert_eq!(notice.title, "No data found");
    }

    #[test]
    fn test_notice_for_unreadable_file() {
        let err = EngineError::UnreadableFile {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.csv"));
        assert_eq!(Notice::from(&err).title, "Error reading file");
    }

    #[test]
    fn test_notice_for_nothing_to_export() {
        let err = EngineError::NothingToExport(ReportKind::BrandShare);
        assert_eq!(err.to_string(), "Nothing to export for brand-share");
        assert_eq!(Notice::from(&err).title, "No data to export");
    }
}
