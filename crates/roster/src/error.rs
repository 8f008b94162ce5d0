//! Error types for the roster core.

use std::io;

use roster_seeker::SeekerError;

/// Errors surfaced by the engine, the stores and the dataset loaders.
///
/// An unusual filter (inverted age range, unknown section) is never an error;
/// it just matches fewer records. Neither is asking for a page past the end.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The storage backend failed.
    #[error("Storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),

    /// A query could not be compiled for the backend.
    #[error("Query compilation failed: {0}")]
    Query(#[from] SeekerError),

    /// Two records share one LRN.
    #[error("Duplicate LRN '{0}'")]
    DuplicateKey(String),

    /// A CSV file could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row was readable but its contents are not a valid student.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl RosterError {
    /// Create an invalid-record error.
    pub fn invalid_record(line: u64, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the storage layer itself failed, as opposed to bad
    /// input data or configuration.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Io(_))
    }
}

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
