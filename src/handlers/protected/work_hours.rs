use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{caller_employee, ListFilter};
use crate::api::ValidatedJson;
use crate::database::models::{NewWorkHour, WorkHour, WorkHourDraft, WorkHourPatch, WorkStatus};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::time_accounting::total_hours;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::not_found("Work hour not found")
}

/// Whether the row belongs to the caller's own employee record.
async fn is_own(state: &AppState, user: &AuthUser, work_hour: &WorkHour) -> Result<bool, ApiError> {
    let employee = state.store.get_employee_by_profile(user.profile_id).await?;
    Ok(employee.is_some_and(|e| e.id == work_hour.employee_id))
}

/// Loads a row the caller may see: any row for admins, otherwise only their own.
async fn load_visible(state: &AppState, user: &AuthUser, id: Uuid) -> Result<WorkHour, ApiError> {
    let work_hour = state.store.get_work_hour(id).await?.ok_or_else(not_found)?;
    if user.role.is_admin() || is_own(state, user, &work_hour).await? {
        Ok(work_hour)
    } else {
        Err(not_found())
    }
}

/// Approval needs the admin or manager role, and only admins sign off their own time.
fn require_approver(user: &AuthUser, own: bool) -> Result<(), ApiError> {
    if !user.role.can_approve() {
        return Err(ApiError::forbidden("Only admins and managers can approve work hours"));
    }
    if own && !user.role.is_admin() {
        return Err(ApiError::forbidden("Cannot approve your own work hours"));
    }
    Ok(())
}

fn stamp_approval(work_hour: &mut WorkHour, user: &AuthUser) {
    work_hour.approved_by = Some(user.profile_id);
    work_hour.approved_at = Some(Utc::now());
}

/// GET /api/work-hours - All rows for admins, the caller's own otherwise
///
/// `?filter=team` lists every row awaiting approval, for admins and managers.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListFilter>,
) -> Result<Json<Vec<WorkHour>>, ApiError> {
    if query.is("team") && user.role.can_approve() {
        let mut rows = state.store.list_work_hours().await?;
        rows.retain(|w| w.status == WorkStatus::PendingApproval);
        return Ok(Json(rows));
    }
    if user.role.is_admin() {
        return Ok(Json(state.store.list_work_hours().await?));
    }
    let employee = caller_employee(&state, &user).await?;
    Ok(Json(state.store.list_work_hours_by_employee(employee.id).await?))
}

/// GET /api/work-hours/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkHour>, ApiError> {
    Ok(Json(load_visible(&state, &user, id).await?))
}

/// POST /api/work-hours - Record time against a task for the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewWorkHour>,
) -> Result<Json<WorkHour>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    if state.store.get_task(body.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task not found"));
    }

    let status = body.status.unwrap_or(WorkStatus::InProgress);
    if status == WorkStatus::Approved {
        require_approver(&user, true)?;
    }
    let total = body
        .end_time
        .map(|end| total_hours(body.start_time, end, body.break_time_minutes))
        .transpose()?;

    let draft = WorkHourDraft {
        employee_id: employee.id,
        task_id: body.task_id,
        start_time: body.start_time,
        end_time: body.end_time,
        break_time_minutes: body.break_time_minutes,
        total_hours: total,
        notes: body.notes,
        status,
    };
    let mut work_hour = state.store.create_work_hour(draft).await?;
    if status == WorkStatus::Approved {
        stamp_approval(&mut work_hour, &user);
        work_hour = state.store.update_work_hour(&work_hour).await?;
    }
    Ok(Json(work_hour))
}

/// PUT /api/work-hours/:id - Partial update; totals are recomputed server side
///
/// Owners and admins may edit any field. Managers may change only the status
/// of other employees' rows. Editing the hours of an approved row sends it
/// back to `pending_approval` unless an admin makes the edit.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<WorkHourPatch>,
) -> Result<Json<WorkHour>, ApiError> {
    let mut work_hour = state.store.get_work_hour(id).await?.ok_or_else(not_found)?;
    let own = is_own(&state, &user, &work_hour).await?;
    if !own && !user.role.is_admin() && !(user.role.can_approve() && patch.is_status_only()) {
        return Err(not_found());
    }

    if let Some(task_id) = patch.task_id {
        if state.store.get_task(task_id).await?.is_none() {
            return Err(ApiError::not_found("Task not found"));
        }
    }

    let was_approved = work_hour.status == WorkStatus::Approved;
    let changes_hours = patch.changes_hours();
    patch.apply_to(&mut work_hour);

    if work_hour.status == WorkStatus::Approved {
        if !was_approved {
            require_approver(&user, own)?;
            stamp_approval(&mut work_hour, &user);
        } else if changes_hours && !user.role.is_admin() {
            tracing::info!(work_hour_id = %id, edited_by = %user.profile_id, "Approved hours edited, approval withdrawn");
            work_hour.status = WorkStatus::PendingApproval;
        }
    }
    if work_hour.status != WorkStatus::Approved {
        work_hour.approved_by = None;
        work_hour.approved_at = None;
    }
    if let Some(end) = work_hour.end_time {
        work_hour.total_hours = Some(total_hours(work_hour.start_time, end, work_hour.break_time_minutes)?);
    }

    Ok(Json(state.store.update_work_hour(&work_hour).await?))
}
