use axum::{extract::State, Extension, Json};

use crate::api::ValidatedJson;
use crate::database::models::{Profile, ProfilePatch, ProfileWithEmployee};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::accounts::normalize_email;
use crate::AppState;

async fn load_own(state: &AppState, user: &AuthUser) -> Result<Profile, ApiError> {
    state
        .store
        .get_profile(user.profile_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))
}

/// GET /api/profiles/me - Caller's profile with the employee row inlined
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileWithEmployee>, ApiError> {
    let profile = load_own(&state, &user).await?;
    let employee = state.store.get_employee_by_profile(profile.id).await?;
    Ok(Json(ProfileWithEmployee { profile, employee }))
}

/// PUT /api/profiles/me - Partial self-service update
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(mut patch): ValidatedJson<ProfilePatch>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = load_own(&state, &user).await?;
    patch.email = patch.email.as_deref().map(normalize_email);
    patch.apply_to(&mut profile);
    let updated = state.store.update_profile(&profile).await?;
    Ok(Json(updated))
}
