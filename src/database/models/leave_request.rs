use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::check_date_range;
use super::overtime::ApprovalStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "leave_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    CompTime,
    Unpaid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_leave_dates"))]
pub struct NewLeaveRequest {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 1, max = 366))]
    pub days: Option<i32>,
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

fn validate_leave_dates(request: &NewLeaveRequest) -> Result<(), ValidationError> {
    check_date_range(request.start_date, request.end_date)
}

impl NewLeaveRequest {
    /// Requested day count, or the inclusive calendar span when absent.
    pub fn resolved_days(&self) -> i32 {
        match self.days {
            Some(days) => days,
            None => {
                let span = (self.end_date - self.start_date).num_days() + 1;
                span.clamp(1, i32::MAX as i64) as i32
            }
        }
    }
}

/// Body of approve/reject calls.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct Decision {
    #[validate(length(max = 2000))]
    pub comments: Option<String>,
}
