// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use super::AuthResponse;
use crate::api::ValidatedJson;
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::services::accounts::normalize_email;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 320))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// POST /api/auth/login - Authenticate by email and password and receive a JWT
///
/// The password is checked against the argon2 hash on the credential row.
/// Profiles seeded without a credential row fall back to the configured
/// demo password, when one is set.
pub async fn post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(profile) = state.store.get_profile_by_email(&normalize_email(&body.email)).await? else {
        tracing::warn!("Login failed: unknown email");
        return Err(invalid_credentials());
    };

    let accepted = match state.store.find_credential(&profile.email).await? {
        Some(credential) => verify_password(&body.password, &credential.password_hash),
        None => state
            .config
            .security
            .demo_password
            .as_deref()
            .is_some_and(|demo| demo == body.password),
    };

    if !accepted {
        tracing::warn!(profile_id = %profile.id, "Login failed: bad password");
        return Err(invalid_credentials());
    }

    let token = state.jwt.issue(&profile)?;
    tracing::info!(profile_id = %profile.id, role = %profile.role, "Login succeeded");
    Ok(Json(AuthResponse::new(token, &profile)))
}
