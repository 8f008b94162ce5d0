//! Error types for the seeker crate.

use thiserror::Error;

/// Errors that can occur when compiling a query for a backend.
///
/// Evaluating a query in memory never fails: unknown fields simply read as
/// null. Only compilation needs every field to resolve to a column.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeekerError {
    /// A clause or sort key names a field the backend has no column for.
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
