//! Error types for the back-office binary.

use thiserror::Error;

use backoffice_datatables::DataTablesError;
use backoffice_events::WorkflowError;
use backoffice_models::{CatalogError, UnknownEntityType};
use backoffice_persistence::PersistenceError;

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, BackofficeError>;

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum BackofficeError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    DataTables(#[from] DataTablesError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("invalid field catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    UnknownEntity(#[from] UnknownEntityType),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
