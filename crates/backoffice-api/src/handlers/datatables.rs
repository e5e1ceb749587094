//! Grid handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use backoffice_datatables::{GridRequest, GridResponse};

use crate::error::Result;
use crate::handlers::blocking;
use crate::state::AppState;
use crate::types::{GridListResponse, SuccessResponse};

/// GET /api/datatables - List registered grids.
pub async fn list_grids(State(state): State<AppState>) -> Json<GridListResponse> {
    let grids: Vec<String> = state.grids.names().map(String::from).collect();
    let total = grids.len();
    Json(GridListResponse { grids, total })
}

/// GET /api/datatables/:grid - One page of a grid.
pub async fn get_page(
    State(state): State<AppState>,
    Path(grid): Path<String>,
    Query(request): Query<GridRequest>,
) -> Result<Json<GridResponse<Value>>> {
    let grid = state.grids.get(&grid)?;
    let page = blocking(move || Ok(grid.page(&request)?)).await?;
    Ok(Json(page))
}

/// GET /api/datatables/:grid/:id - One record.
pub async fn get_record(
    State(state): State<AppState>,
    Path((grid, id)): Path<(String, i64)>,
) -> Result<Json<Value>> {
    let grid = state.grids.get(&grid)?;
    let record = blocking(move || Ok(grid.find(id)?)).await?;
    Ok(Json(record))
}

/// POST /api/datatables/:grid - Add a record.
pub async fn add_record(
    State(state): State<AppState>,
    Path(grid): Path<String>,
    Json(record): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let grid = state.grids.get(&grid)?;
    let saved = blocking(move || Ok(grid.add(record)?)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/datatables/:grid/:id - Overwrite a record.
pub async fn update_record(
    State(state): State<AppState>,
    Path((grid, id)): Path<(String, i64)>,
    Json(record): Json<Value>,
) -> Result<Json<Value>> {
    let grid = state.grids.get(&grid)?;
    let saved = blocking(move || Ok(grid.update(id, record)?)).await?;
    Ok(Json(saved))
}

/// DELETE /api/datatables/:grid/:id - Remove a record.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((grid, id)): Path<(String, i64)>,
) -> Result<Json<SuccessResponse>> {
    let grid = state.grids.get(&grid)?;
    blocking(move || Ok(grid.remove(id)?)).await?;
    Ok(Json(SuccessResponse {
        message: "record deleted".to_string(),
    }))
}
