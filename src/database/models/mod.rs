pub mod attendance;
pub mod credential;
pub mod department;
pub mod employee;
pub mod leave_request;
pub mod overtime;
pub mod profile;
pub mod project;
pub mod task;
pub mod time_session;
pub mod work_hour;

pub use attendance::{Attendance, AttendanceStatus};
pub use credential::Credential;
pub use department::{Department, DepartmentPatch, NewDepartment};
pub use employee::{Employee, EmployeePatch, EmployeeStatus, NewEmployee};
pub use leave_request::{Decision, LeaveRequest, LeaveType, NewLeaveRequest};
pub use overtime::{ApprovalStatus, NewOvertime, Overtime};
pub use profile::{NewProfile, Profile, ProfilePatch, ProfileWithEmployee, Role, RoleChange};
pub use project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use task::{NewTask, Task, TaskPatch, TaskType};
pub use time_session::{
    ActiveTimeSession, NewTimeSession, SessionStop, StopTimeSession, StoppedTimeSession, TimeSession,
};
pub use work_hour::{NewWorkHour, WorkHour, WorkHourDraft, WorkHourPatch, WorkStatus};

use chrono::NaiveDate;
use validator::ValidationError;

pub(crate) fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::new("end_before_start").with_message("endDate must not be before startDate".into()));
    }
    Ok(())
}
