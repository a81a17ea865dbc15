use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{caller_employee, ListFilter};
use crate::api::ValidatedJson;
use crate::database::models::{
    ActiveTimeSession, NewTimeSession, SessionStop, StopTimeSession, StoppedTimeSession, TimeSession,
    WorkHourDraft, WorkStatus,
};
use crate::database::store::SessionDraft;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::time_accounting::{elapsed_hours, total_hours};
use crate::AppState;

/// GET /api/time-sessions - Active sessions with live elapsed hours
///
/// `?filter=active` narrows the list to the caller's own sessions.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListFilter>,
) -> Result<Json<Vec<ActiveTimeSession>>, ApiError> {
    let sessions = if query.is("active") {
        let employee = caller_employee(&state, &user).await?;
        state.store.list_active_sessions_by_employee(employee.id).await?
    } else {
        state.store.list_active_sessions().await?
    };

    let now = Utc::now();
    let items = sessions
        .into_iter()
        .map(|session| ActiveTimeSession {
            elapsed_hours: elapsed_hours(session.start_time, now),
            session,
        })
        .collect();
    Ok(Json(items))
}

/// POST /api/time-sessions - Start a timer on a task
///
/// Starting twice creates two independent active sessions.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewTimeSession>,
) -> Result<Json<TimeSession>, ApiError> {
    let employee = caller_employee(&state, &user).await?;
    if state.store.get_task(body.task_id).await?.is_none() {
        return Err(ApiError::not_found("Task not found"));
    }

    let session = state
        .store
        .create_time_session(SessionDraft {
            employee_id: employee.id,
            task_id: body.task_id,
            start_time: body.start_time.unwrap_or_else(Utc::now),
            notes: body.notes,
        })
        .await?;
    tracing::debug!(session_id = %session.id, employee_id = %employee.id, "Time session started");
    Ok(Json(session))
}

/// POST /api/time-sessions/:id/stop - Close the session into a completed work hour
pub async fn stop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<StopTimeSession>,
) -> Result<Json<StoppedTimeSession>, ApiError> {
    let session = state
        .store
        .get_time_session(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    if !user.role.is_admin() {
        let employee = caller_employee(&state, &user).await?;
        if session.employee_id != employee.id {
            return Err(ApiError::not_found("Session not found"));
        }
    }
    if !session.is_active {
        return Err(ApiError::conflict("Time session already stopped"));
    }

    let end_time = body.end_time.unwrap_or_else(Utc::now);
    let break_minutes = body.break_time_minutes.unwrap_or(0);
    let total = total_hours(session.start_time, end_time, break_minutes)?;

    let stop = SessionStop {
        notes: body.notes.clone(),
        work_hour: WorkHourDraft {
            employee_id: session.employee_id,
            task_id: session.task_id,
            start_time: session.start_time,
            end_time: Some(end_time),
            break_time_minutes: break_minutes,
            total_hours: Some(total),
            notes: body.notes.or(session.notes),
            status: WorkStatus::Completed,
        },
    };

    let (session, work_hour) = state.store.stop_time_session(id, stop).await?;
    tracing::debug!(session_id = %session.id, work_hour_id = %work_hour.id, total_hours = %total, "Time session stopped");
    Ok(Json(StoppedTimeSession { session, work_hour }))
}
