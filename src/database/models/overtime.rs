use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Shared by overtime and leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Overtime {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOvertime {
    pub date: NaiveDate,
    #[validate(custom(function = "positive_hours"))]
    pub hours: Decimal,
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

fn positive_hours(hours: &Decimal) -> Result<(), ValidationError> {
    if hours.is_sign_positive() && !hours.is_zero() && *hours <= Decimal::from(24) {
        Ok(())
    } else {
        Err(ValidationError::new("hours_range").with_message("hours must be greater than 0 and at most 24".into()))
    }
}
