use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::*;

/// Everything registration writes in one unit.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub password_hash: String,
    pub profile: NewProfile,
    pub employee: NewEmployee,
}

#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub employee_id: Uuid,
    pub task_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeaveDraft {
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OvertimeDraft {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub reason: Option<String>,
}

/// Approve or reject a pending leave/overtime row.
#[derive(Debug, Clone)]
pub struct ApprovalDecision {
    pub status: ApprovalStatus,
    pub approved_by: Uuid,
    pub approved_at: DateTime<Utc>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClockOut {
    pub at: DateTime<Utc>,
    pub total_hours: Decimal,
}

/// Persistence boundary injected into handlers through `AppState`.
///
/// `update_*` methods persist the full row as given and fail with
/// `StoreError::NotFound` when the id no longer exists. List methods return
/// rows in the order the API exposes them.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Accounts and profiles
    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, StoreError>;
    /// Creates credential, profile and employee atomically. Duplicate email is a conflict.
    async fn register_account(&self, account: NewAccount) -> Result<(Profile, Employee), StoreError>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    /// Also re-keys the credential row when the email changed.
    async fn update_profile(&self, profile: &Profile) -> Result<Profile, StoreError>;

    // Departments (ordered by name)
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError>;
    async fn get_department(&self, id: Uuid) -> Result<Option<Department>, StoreError>;
    async fn create_department(&self, department: NewDepartment) -> Result<Department, StoreError>;
    async fn update_department(&self, department: &Department) -> Result<Department, StoreError>;

    // Employees (newest first)
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;
    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;
    async fn get_employee_by_profile(&self, profile_id: Uuid) -> Result<Option<Employee>, StoreError>;
    async fn update_employee(&self, employee: &Employee) -> Result<Employee, StoreError>;

    // Tasks (ordered by name)
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;
    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError>;
    async fn update_task(&self, task: &Task) -> Result<Task, StoreError>;

    // Work hours (newest start first)
    async fn list_work_hours(&self) -> Result<Vec<WorkHour>, StoreError>;
    async fn list_work_hours_by_employee(&self, employee_id: Uuid) -> Result<Vec<WorkHour>, StoreError>;
    async fn get_work_hour(&self, id: Uuid) -> Result<Option<WorkHour>, StoreError>;
    async fn create_work_hour(&self, work_hour: WorkHourDraft) -> Result<WorkHour, StoreError>;
    async fn update_work_hour(&self, work_hour: &WorkHour) -> Result<WorkHour, StoreError>;

    // Time sessions (active only, newest start first)
    async fn list_active_sessions(&self) -> Result<Vec<TimeSession>, StoreError>;
    async fn list_active_sessions_by_employee(&self, employee_id: Uuid) -> Result<Vec<TimeSession>, StoreError>;
    async fn get_time_session(&self, id: Uuid) -> Result<Option<TimeSession>, StoreError>;
    async fn create_time_session(&self, session: SessionDraft) -> Result<TimeSession, StoreError>;
    /// Deactivates the session and inserts its work hour in one unit.
    /// A session that is no longer active is a conflict.
    async fn stop_time_session(&self, id: Uuid, stop: SessionStop) -> Result<(TimeSession, WorkHour), StoreError>;

    // Projects (newest first)
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError>;
    async fn update_project(&self, project: &Project) -> Result<Project, StoreError>;

    // Overtime (newest date first)
    async fn list_overtime_by_employee(&self, employee_id: Uuid) -> Result<Vec<Overtime>, StoreError>;
    async fn list_pending_overtime(&self) -> Result<Vec<Overtime>, StoreError>;
    async fn create_overtime(&self, overtime: OvertimeDraft) -> Result<Overtime, StoreError>;
    /// Only pending rows can be decided; anything else is a conflict.
    async fn decide_overtime(&self, id: Uuid, decision: ApprovalDecision) -> Result<Overtime, StoreError>;

    // Leave requests (newest first)
    async fn list_leave_requests_by_employee(&self, employee_id: Uuid) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn list_pending_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn create_leave_request(&self, request: LeaveDraft) -> Result<LeaveRequest, StoreError>;
    /// Only pending rows can be decided; anything else is a conflict.
    async fn decide_leave_request(&self, id: Uuid, decision: ApprovalDecision) -> Result<LeaveRequest, StoreError>;

    // Attendance
    async fn get_attendance(&self, employee_id: Uuid, date: NaiveDate) -> Result<Option<Attendance>, StoreError>;
    /// A second row for the same employee and day is a conflict.
    async fn clock_in(&self, employee_id: Uuid, date: NaiveDate, at: DateTime<Utc>) -> Result<Attendance, StoreError>;
    /// A row that already has a clock-out is a conflict.
    async fn clock_out(&self, id: Uuid, clock_out: ClockOut) -> Result<Attendance, StoreError>;
}
