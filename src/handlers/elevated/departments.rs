use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::ValidatedJson;
use crate::database::models::{Department, DepartmentPatch, NewDepartment};
use crate::error::ApiError;
use crate::AppState;

/// POST /api/departments
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NewDepartment>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.store.create_department(body).await?))
}

/// PUT /api/departments/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<DepartmentPatch>,
) -> Result<Json<Department>, ApiError> {
    let mut department = state
        .store
        .get_department(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Department not found"))?;
    patch.apply_to(&mut department);
    Ok(Json(state.store.update_department(&department).await?))
}
