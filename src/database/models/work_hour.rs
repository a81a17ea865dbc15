use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    InProgress,
    Completed,
    PendingApproval,
    Approved,
}

/// A completed or in-progress timed work record tied to a task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkHour {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub task_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub break_time_minutes: i32,
    pub total_hours: Option<Decimal>,
    pub notes: Option<String>,
    pub status: WorkStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `POST /api/work-hours` body. The employee comes from the caller and the
/// total is computed server-side, so neither is accepted here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkHour {
    pub task_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1440))]
    pub break_time_minutes: i32,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub status: Option<WorkStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkHourPatch {
    pub task_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 1440))]
    pub break_time_minutes: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub status: Option<WorkStatus>,
}

impl WorkHourPatch {
    /// A review edit: nothing but `status` is set.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.task_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.break_time_minutes.is_none()
            && self.notes.is_none()
    }

    /// Whether the edit changes what was worked, as opposed to its review state.
    pub fn changes_hours(&self) -> bool {
        self.task_id.is_some()
            || self.start_time.is_some()
            || self.end_time.is_some()
            || self.break_time_minutes.is_some()
    }

    /// Applies the edit. `total_hours` is left for the caller to recompute.
    pub fn apply_to(self, work_hour: &mut WorkHour) {
        if let Some(v) = self.task_id {
            work_hour.task_id = v;
        }
        if let Some(v) = self.start_time {
            work_hour.start_time = v;
        }
        if let Some(v) = self.end_time {
            work_hour.end_time = Some(v);
        }
        if let Some(v) = self.break_time_minutes {
            work_hour.break_time_minutes = v;
        }
        if let Some(v) = self.notes {
            work_hour.notes = Some(v);
        }
        if let Some(v) = self.status {
            work_hour.status = v;
        }
    }
}

/// Fully resolved row handed to the store for insertion.
#[derive(Debug, Clone)]
pub struct WorkHourDraft {
    pub employee_id: Uuid,
    pub task_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub break_time_minutes: i32,
    pub total_hours: Option<Decimal>,
    pub notes: Option<String>,
    pub status: WorkStatus,
}
