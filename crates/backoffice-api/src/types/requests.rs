//! Request DTOs for the API.

use serde::Deserialize;

/// Report list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportListQuery {
    /// Maximum number of reports to return.
    pub limit: Option<usize>,
}
