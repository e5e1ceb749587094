//! Response DTOs for the API.

use serde::Serialize;

use backoffice_events::PipelineReport;
use backoffice_models::{EntityType, RelatedFields};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Registered grids.
#[derive(Debug, Clone, Serialize)]
pub struct GridListResponse {
    pub grids: Vec<String>,
    pub total: usize,
}

/// Recent pipeline reports, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<PipelineReport>,
    pub total: usize,
}

/// Related-entity field sets of one entity type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub entity: EntityType,
    pub related_fields: RelatedFields,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    /// Success message.
    pub message: String,
}
