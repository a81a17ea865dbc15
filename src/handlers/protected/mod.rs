// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here receives the caller as `Extension<AuthUser>`, inserted
// by `jwt_auth_middleware`. Reads are scoped to the caller's own employee
// row unless the caller is an admin; manager-or-admin checks are made
// explicitly in the handlers that need them.
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware

use serde::Deserialize;

use crate::database::models::Employee;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

pub mod attendance;
pub mod departments;
pub mod leave_balance;
pub mod leave_requests;
pub mod overtime;
pub mod profiles;
pub mod projects;
pub mod tasks;
pub mod time_sessions;
pub mod work_hours;

/// `?filter=` on list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub filter: Option<String>,
}

impl ListFilter {
    pub fn is(&self, value: &str) -> bool {
        self.filter.as_deref() == Some(value)
    }
}

/// The employee row behind the calling profile
pub async fn caller_employee(state: &AppState, user: &AuthUser) -> Result<Employee, ApiError> {
    state
        .store
        .get_employee_by_profile(user.profile_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee record not found"))
}
