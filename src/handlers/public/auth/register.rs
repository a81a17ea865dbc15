// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use super::AuthResponse;
use crate::api::ValidatedJson;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::services::accounts::{create_account, AccountError, AccountRequest};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

/// POST /api/auth/register - Create an employee account and receive a JWT
///
/// Profile, employee row and credential are written in one unit; new
/// accounts always get the `employee` role.
pub async fn post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = AccountRequest {
        email: &body.email,
        password: &body.password,
        first_name: &body.first_name,
        last_name: &body.last_name,
        role: Role::Employee,
    };

    let profile = match create_account(state.store.as_ref(), request).await {
        Ok(profile) => profile,
        Err(AccountError::AlreadyExists) => return Err(ApiError::bad_request("User already exists")),
        Err(AccountError::Auth(e)) => return Err(e.into()),
        Err(AccountError::Store(e)) => return Err(e.into()),
    };

    let token = state.jwt.issue(&profile)?;
    Ok(Json(AuthResponse::new(token, &profile)))
}
