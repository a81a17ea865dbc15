use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnLeave,
}

/// Employment relationship attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub department_id: Option<Uuid>,
    pub hire_date: NaiveDate,
    pub hourly_rate: Option<Decimal>,
    pub status: EmployeeStatus,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub department_id: Option<Uuid>,
    pub hire_date: NaiveDate,
    pub hourly_rate: Option<Decimal>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub department_id: Option<Uuid>,
    pub hire_date: Option<NaiveDate>,
    pub hourly_rate: Option<Decimal>,
    pub status: Option<EmployeeStatus>,
    #[validate(length(max = 200))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 50))]
    pub emergency_contact_phone: Option<String>,
}

impl EmployeePatch {
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(v) = self.department_id {
            employee.department_id = Some(v);
        }
        if let Some(v) = self.hire_date {
            employee.hire_date = v;
        }
        if let Some(v) = self.hourly_rate {
            employee.hourly_rate = Some(v);
        }
        if let Some(v) = self.status {
            employee.status = v;
        }
        if let Some(v) = self.emergency_contact_name {
            employee.emergency_contact_name = Some(v);
        }
        if let Some(v) = self.emergency_contact_phone {
            employee.emergency_contact_phone = Some(v);
        }
    }
}
