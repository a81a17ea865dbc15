use std::collections::HashMap;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::services::time_accounting::TimeError;

/// Error returned by every handler. Renders as `{"message": ...}`, with
/// `fieldErrors` added for validation failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            ApiError::Validation { message, field_errors } => json!({
                "message": message,
                "fieldErrors": field_errors,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// 400 "Validation failed" keyed by camelCase field name
    pub fn validation(field_errors: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => {
                tracing::debug!("Store lookup missed: {}", what);
                ApiError::not_found("Record not found")
            }
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::ConfigMissing(key) => {
                tracing::error!("Store misconfigured: missing {}", key);
                ApiError::Unavailable("Database temporarily unavailable".to_string())
            }
            StoreError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::Internal
            }
        }
    }
}

impl From<TimeError> for ApiError {
    fn from(err: TimeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => ApiError::forbidden("Invalid or expired token"),
            other => {
                tracing::error!("Auth failure: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(ApiError::from(StoreError::not_found("tasks x")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(StoreError::conflict("dup")).status(), StatusCode::CONFLICT);

        let internal = ApiError::from(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body(), json!({ "message": "Internal server error" }));
    }

    #[test]
    fn validation_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), "Invalid email".to_string());
        let body = ApiError::validation(fields).body();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["fieldErrors"]["email"], "Invalid email");

        assert!(ApiError::forbidden("nope").body().get("fieldErrors").is_none());
    }

    #[test]
    fn time_errors_are_bad_requests() {
        let err = ApiError::from(TimeError::BreakExceedsElapsed);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Break time exceeds the elapsed time");
    }
}
