//! Error types for pdfdocx library.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for pdfdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// A strategy's required capability cannot run at all.
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// A strategy ran but failed while processing the document.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Every strategy was unavailable or failed.
    #[error("All conversion strategies failed ({})", summarize(.attempts))]
    StrategiesExhausted {
        /// One record per attempted strategy, in order.
        attempts: Vec<AttemptRecord>,
    },

    /// The document writer could not produce the output file.
    #[error("Failed to write {}: {reason}", .path.display())]
    WriteFailed {
        /// Destination that was being written
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A bullet pattern does not compile.
    #[error("Invalid bullet pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern source
        pattern: String,
        /// Regex compiler message
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single strategy did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The capability was not installed or not reachable.
    Unavailable(String),
    /// The capability ran and failed.
    Failed(String),
}

/// Outcome of one strategy attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Strategy name
    pub strategy: String,
    /// Why it was skipped
    pub failure: AttemptFailure,
}

impl std::fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            AttemptFailure::Unavailable(reason) => {
                write!(f, "{}: unavailable ({})", self.strategy, reason)
            }
            AttemptFailure::Failed(reason) => write!(f, "{}: failed ({})", self.strategy, reason),
        }
    }
}

fn summarize(attempts: &[AttemptRecord]) -> String {
    if attempts.is_empty() {
        return "no strategies configured".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CapabilityUnavailable("pdftotext not found".to_string());
        assert_eq!(err.to_string(), "Capability unavailable: pdftotext not found");

        let err = Error::WriteFailed {
            path: PathBuf::from("/tmp/out.docx"),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to write /tmp/out.docx: disk full");
    }

    #[test]
    fn test_exhausted_lists_attempts() {
        let err = Error::StrategiesExhausted {
            attempts: vec![
                AttemptRecord {
                    strategy: "spans".to_string(),
                    failure: AttemptFailure::Failed("bad xref".to_string()),
                },
                AttemptRecord {
                    strategy: "pdftotext".to_string(),
                    failure: AttemptFailure::Unavailable("not installed".to_string()),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("spans: failed (bad xref)"));
        assert!(msg.contains("pdftotext: unavailable (not installed)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
