use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::database::models::Department;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/departments - All departments by name
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>, ApiError> {
    Ok(Json(state.store.list_departments().await?))
}

/// GET /api/departments/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Department>, ApiError> {
    state
        .store
        .get_department(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Department not found"))
}
