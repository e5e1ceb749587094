//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use backoffice_datatables::DataTablesError;
use backoffice_events::{PipelineReport, WorkflowError};

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type for consistent error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Record failed validation.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// A critical workflow task failed.
    #[error("pipeline aborted by critical task '{task}'")]
    PipelineAborted {
        task: String,
        report: Box<PipelineReport>,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PipelineAborted { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            ApiError::PipelineAborted { report, .. } => json!({
                "error": self.to_string(),
                "report": report,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<DataTablesError> for ApiError {
    fn from(err: DataTablesError) -> Self {
        match err {
            DataTablesError::NotFound(what) => ApiError::NotFound(what),
            DataTablesError::Validation(details) => ApiError::Validation(details),
            DataTablesError::InvalidSortColumn(_) | DataTablesError::InvalidRecord(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DataTablesError::ConfigurationUnavailable(_) | DataTablesError::Persistence(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Aborted { task, report } => ApiError::PipelineAborted { task, report },
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_datatables_error_mapping() {
        let err: ApiError = DataTablesError::InvalidSortColumn(7).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = DataTablesError::NotFound("candidate 3".into()).into();
        assert_eq!(err.to_string(), "not found: candidate 3");

        let err: ApiError = DataTablesError::ConfigurationUnavailable("x".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_workflow_error_mapping() {
        let err: ApiError = WorkflowError::LockPoisoned("history".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
