use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::database::models::Task;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/tasks - Active tasks by name
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.list_active_tasks().await?))
}

/// GET /api/tasks/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Task>, ApiError> {
    state
        .store
        .get_task(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task not found"))
}
