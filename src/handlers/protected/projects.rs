use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::ValidatedJson;
use crate::database::models::{NewProject, Project, ProjectPatch};
use crate::error::ApiError;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::not_found("Project not found")
}

/// GET /api/projects - Newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.store.list_projects().await?))
}

/// GET /api/projects/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Project>, ApiError> {
    state.store.get_project(id).await?.map(Json).ok_or_else(not_found)
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NewProject>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.store.create_project(body).await?))
}

/// PATCH /api/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<ProjectPatch>,
) -> Result<Json<Project>, ApiError> {
    let mut project = state.store.get_project(id).await?.ok_or_else(not_found)?;
    patch.apply_to(&mut project);
    if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
        if end < start {
            return Err(ApiError::bad_request("endDate must not be before startDate"));
        }
    }
    Ok(Json(state.store.update_project(&project).await?))
}
