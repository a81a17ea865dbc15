use axum::{extract::State, Extension, Json};
use chrono::Utc;

use super::caller_employee;
use crate::database::models::Attendance;
use crate::database::store::ClockOut;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::time_accounting::total_hours;
use crate::AppState;

// Days are UTC calendar days.

/// GET /api/attendance/today - Today's row, or null before clock-in
pub async fn today(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<Attendance>>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let today = Utc::now().date_naive();
    Ok(Json(state.store.get_attendance(employee.id, today).await?))
}

/// POST /api/attendance/clock-in
pub async fn clock_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Attendance>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let now = Utc::now();
    let row = state.store.clock_in(employee.id, now.date_naive(), now).await?;
    Ok(Json(row))
}

/// POST /api/attendance/clock-out - Stamps clock-out and the day's total
pub async fn clock_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Attendance>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let now = Utc::now();
    let row = state
        .store
        .get_attendance(employee.id, now.date_naive())
        .await?
        .ok_or_else(|| ApiError::bad_request("No clock-in record found for today"))?;
    if row.clock_out.is_some() {
        return Err(ApiError::conflict("Already clocked out today"));
    }
    let clock_in = row
        .clock_in
        .ok_or_else(|| ApiError::bad_request("No clock-in record found for today"))?;

    let total = total_hours(clock_in, now, 0)?;
    let row = state
        .store
        .clock_out(row.id, ClockOut { at: now, total_hours: total })
        .await?;
    Ok(Json(row))
}
