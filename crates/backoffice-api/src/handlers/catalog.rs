//! Field catalog handler.

use axum::{
    extract::{Path, State},
    Json,
};

use backoffice_models::EntityType;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::CatalogResponse;

/// GET /api/catalog/:entity - Related-entity field sets of an entity type.
///
/// Accepts the platform name (`PlacementCommission`) or the catalog key
/// (`placement_commission`).
pub async fn get_catalog(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<CatalogResponse>> {
    let entity: EntityType = entity
        .parse()
        .map_err(|e: backoffice_models::UnknownEntityType| ApiError::NotFound(e.to_string()))?;

    Ok(Json(CatalogResponse {
        entity,
        related_fields: state
            .catalog
            .related_fields(entity)
            .cloned()
            .unwrap_or_default(),
    }))
}
