//! Error types for grid operations.

use backoffice_persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur while serving a grid.
#[derive(Error, Debug)]
pub enum DataTablesError {
    /// Record or grid not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Record failed validation; nothing was written.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The grid's column configuration could not be derived.
    #[error("column configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    /// Sort requested on a column index the grid does not define.
    #[error("sort column {0} is not configured")]
    InvalidSortColumn(usize),

    /// Record payload could not be converted.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Storage failure.
    #[error("persistence error: {0}")]
    Persistence(PersistenceError),
}

impl From<PersistenceError> for DataTablesError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { kind, id } => {
                DataTablesError::NotFound(format!("{kind} {id}"))
            }
            other => DataTablesError::Persistence(other),
        }
    }
}

impl From<serde_json::Error> for DataTablesError {
    fn from(err: serde_json::Error) -> Self {
        DataTablesError::InvalidRecord(err.to_string())
    }
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, DataTablesError>;
