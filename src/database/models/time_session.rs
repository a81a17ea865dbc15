use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::work_hour::{WorkHour, WorkHourDraft};

/// A live, not-yet-finalized work timer. Converted into a WorkHour on stop.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeSession {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub task_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeSession {
    pub task_id: Uuid,
    /// Defaults to the server clock.
    pub start_time: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeSession {
    /// Client clock; defaults to the server clock.
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 1440))]
    pub break_time_minutes: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Listing item: the session plus hours elapsed so far.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimeSession {
    #[serde(flatten)]
    pub session: TimeSession,
    pub elapsed_hours: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedTimeSession {
    pub session: TimeSession,
    pub work_hour: WorkHour,
}

/// What the store needs to close a session atomically.
#[derive(Debug, Clone)]
pub struct SessionStop {
    pub notes: Option<String>,
    pub work_hour: WorkHourDraft,
}
