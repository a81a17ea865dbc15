use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{caller_employee, ListFilter};
use crate::api::ValidatedJson;
use crate::database::models::{ApprovalStatus, Decision, LeaveRequest, NewLeaveRequest};
use crate::database::store::{ApprovalDecision, LeaveDraft};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /api/leave-requests - The caller's requests, newest first
///
/// `?filter=team` returns every pending request instead, for admins and
/// managers. Other roles asking for the team view get their own list.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListFilter>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError> {
    if query.is("team") && user.role.can_approve() {
        return Ok(Json(state.store.list_pending_leave_requests().await?));
    }
    let employee = caller_employee(&state, &user).await?;
    Ok(Json(state.store.list_leave_requests_by_employee(employee.id).await?))
}

/// POST /api/leave-requests
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewLeaveRequest>,
) -> Result<Json<LeaveRequest>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    let draft = LeaveDraft {
        employee_id: employee.id,
        leave_type: body.leave_type,
        start_date: body.start_date,
        end_date: body.end_date,
        days: body.resolved_days(),
        reason: body.reason,
    };
    Ok(Json(state.store.create_leave_request(draft).await?))
}

async fn decide(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: ApprovalStatus,
    comments: Option<String>,
) -> Result<LeaveRequest, ApiError> {
    let decision = ApprovalDecision {
        status,
        approved_by: user.profile_id,
        approved_at: Utc::now(),
        comments,
    };
    let request = state.store.decide_leave_request(id, decision).await?;
    tracing::info!(leave_request_id = %id, decided_by = %user.profile_id, status = ?status, "Leave request decided");
    Ok(request)
}

/// POST /api/leave-requests/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<Decision>,
) -> Result<Json<LeaveRequest>, ApiError> {
    if !user.role.can_approve() {
        return Err(ApiError::forbidden("Only admins and managers can approve leave requests"));
    }
    Ok(Json(decide(&state, &user, id, ApprovalStatus::Approved, body.comments).await?))
}

/// POST /api/leave-requests/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<Decision>,
) -> Result<Json<LeaveRequest>, ApiError> {
    if !user.role.can_approve() {
        return Err(ApiError::forbidden("Only admins and managers can reject leave requests"));
    }
    Ok(Json(decide(&state, &user, id, ApprovalStatus::Rejected, body.comments).await?))
}
