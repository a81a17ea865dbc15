use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            profile_id: claims.profile_id,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context.
/// A missing token is 401; a token that fails verification is 403.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        tracing::debug!("Rejected request without token: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = state.jwt.verify(&token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::forbidden("Invalid or expired token")
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!(profile_id = %auth_user.profile_id, role = %auth_user.role, "Authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
///
/// The token is the second word whatever the scheme, so `Basic abc` is
/// passed on to verification (and fails there with 403).
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Access token required".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    auth_str
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| "Access token required".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_is_the_second_word() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc");

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }
}
