use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::ValidatedJson;
use crate::database::models::{NewTask, Task, TaskPatch};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// POST /api/tasks - `createdBy` is always the calling admin
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(mut body): ValidatedJson<NewTask>,
) -> Result<Json<Task>, ApiError> {
    body.created_by = Some(user.profile_id);
    Ok(Json(state.store.create_task(body).await?))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let mut task = state
        .store
        .get_task(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    patch.apply_to(&mut task);
    Ok(Json(state.store.update_task(&task).await?))
}
