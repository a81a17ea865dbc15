use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::ValidatedJson;
use crate::database::models::{Profile, RoleChange};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// PUT /api/profiles/:id/role - Takes effect on the profile's next login
pub async fn update_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<RoleChange>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = state
        .store
        .get_profile(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    let previous = profile.role;
    profile.role = body.role;

    let updated = state.store.update_profile(&profile).await?;
    tracing::info!(profile_id = %id, changed_by = %user.profile_id, from = %previous, to = %updated.role, "Role changed");
    Ok(Json(updated))
}
