//! Error types for event workflows.

use backoffice_persistence::PersistenceError;
use thiserror::Error;

use crate::report::PipelineReport;

/// Failure of a single task. Recorded in the pipeline report.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Entity lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(#[from] PersistenceError),

    /// No fields are configured for a related entity.
    #[error("no fields configured for related entity '{0}'")]
    MissingFields(String),

    /// Outbound notification failed.
    #[error("notification failed: {0}")]
    Notify(String),

    /// Task-specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by the dispatcher.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A critical task failed and the remaining tasks were not run.
    #[error("pipeline aborted by critical task '{task}'")]
    Aborted {
        task: String,
        report: Box<PipelineReport>,
    },

    /// Persistence error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for task bodies.
pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
