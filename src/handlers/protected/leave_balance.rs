use axum::{extract::State, Extension, Json};
use chrono::{Datelike, Utc};

use super::caller_employee;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::leave_balance::{remaining, LeaveBalance};
use crate::AppState;

/// GET /api/leave-balance - Remaining days per leave type this calendar year
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LeaveBalance>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let requests = state.store.list_leave_requests_by_employee(employee.id).await?;
    let year = Utc::now().year();
    Ok(Json(remaining(&state.config.leave, &requests, year)))
}
