use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{caller_employee, ListFilter};
use crate::api::ValidatedJson;
use crate::database::models::{ApprovalStatus, Decision, NewOvertime, Overtime};
use crate::database::store::{ApprovalDecision, OvertimeDraft};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /api/overtime - The caller's overtime, newest date first
///
/// `?filter=team` lists every pending entry for admins and managers.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListFilter>,
) -> Result<Json<Vec<Overtime>>, ApiError> {
    if query.is("team") && user.role.can_approve() {
        return Ok(Json(state.store.list_pending_overtime().await?));
    }
    let employee = caller_employee(&state, &user).await?;
    Ok(Json(state.store.list_overtime_by_employee(employee.id).await?))
}

/// POST /api/overtime
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewOvertime>,
) -> Result<Json<Overtime>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let draft = OvertimeDraft {
        employee_id: employee.id,
        date: body.date,
        hours: body.hours,
        reason: body.reason,
    };
    Ok(Json(state.store.create_overtime(draft).await?))
}

async fn decide(state: &AppState, user: &AuthUser, id: Uuid, status: ApprovalStatus) -> Result<Overtime, ApiError> {
    let decision = ApprovalDecision {
        status,
        approved_by: user.profile_id,
        approved_at: Utc::now(),
        comments: None,
    };
    let overtime = state.store.decide_overtime(id, decision).await?;
    tracing::info!(overtime_id = %id, decided_by = %user.profile_id, status = ?status, "Overtime decided");
    Ok(overtime)
}

/// POST /api/overtime/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(_body): ValidatedJson<Decision>,
) -> Result<Json<Overtime>, ApiError> {
    if !user.role.can_approve() {
        return Err(ApiError::forbidden("Only admins and managers can approve overtime"));
    }
    Ok(Json(decide(&state, &user, id, ApprovalStatus::Approved).await?))
}

/// POST /api/overtime/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(_body): ValidatedJson<Decision>,
) -> Result<Json<Overtime>, ApiError> {
    if !user.role.can_approve() {
        return Err(ApiError::forbidden("Only admins and managers can reject overtime"));
    }
    Ok(Json(decide(&state, &user, id, ApprovalStatus::Rejected).await?))
}
