use axum::{extract::Request, middleware::Next, response::Response};

use super::AuthUser;
use crate::error::ApiError;

/// Admin gate for elevated routes. Runs after `jwt_auth_middleware` and
/// before any body extraction, so payload validity never matters here.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

    if !user.role.is_admin() {
        tracing::warn!(profile_id = %user.profile_id, role = %user.role, "Admin route refused");
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}
