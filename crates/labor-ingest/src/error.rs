//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

use labor_model::ModelError;

/// Errors that can occur while loading source files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not map to a supported reader.
    #[error("unsupported source format for {path}")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// Failed to parse delimited text.
    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// Requested worksheet does not exist.
    #[error("worksheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    /// Source has no rows at all.
    #[error("source is empty: {path}")]
    EmptySource { path: PathBuf },

    // === Entity Code Errors ===
    /// Entity code row failed validation.
    #[error("invalid entity code at line {line} of {path}: {source}")]
    InvalidEntity {
        path: PathBuf,
        line: u64,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Map an `io::Error` on `path` to the matching ingest error.
pub(crate) fn io_error(path: &std::path::Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/st39_oh_cou2020.txt"),
        };
        assert_eq!(
            err.to_string(),
            "source file not found: /data/st39_oh_cou2020.txt"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let mapped = io_error(std::path::Path::new("missing.csv"), error);
        assert!(matches!(mapped, IngestError::FileNotFound { .. }));
    }
}
