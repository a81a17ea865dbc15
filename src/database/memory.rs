use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::*;
use crate::database::store::{
    ApprovalDecision, ClockOut, LeaveDraft, NewAccount, OvertimeDraft, SessionDraft, Store,
};

#[derive(Default)]
struct Tables {
    credentials: Vec<Credential>,
    profiles: Vec<Profile>,
    departments: Vec<Department>,
    employees: Vec<Employee>,
    tasks: Vec<Task>,
    work_hours: Vec<WorkHour>,
    time_sessions: Vec<TimeSession>,
    projects: Vec<Project>,
    overtime: Vec<Overtime>,
    leave_requests: Vec<LeaveRequest>,
    attendance: Vec<Attendance>,
}

/// Process-local store used when no database is configured, and in tests.
/// Each operation holds the table lock for its whole duration, so multi-row
/// writes are atomic with respect to other requests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_id<'a, T>(rows: &'a [T], id: Uuid, key: impl Fn(&T) -> Uuid) -> Option<&'a T> {
    rows.iter().find(|row| key(row) == id)
}

/// Replaces the stored row with the same id, returning the stored copy.
fn replace<T: Clone>(rows: &mut [T], row: &T, id: Uuid, key: impl Fn(&T) -> Uuid, table: &str) -> Result<T, StoreError> {
    let slot = rows
        .iter_mut()
        .find(|existing| key(existing) == id)
        .ok_or_else(|| StoreError::not_found(format!("{} {}", table, id)))?;
    *slot = row.clone();
    Ok(slot.clone())
}

fn newest_first<T: Clone, K: Ord>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.credentials.iter().find(|c| c.username == username).cloned())
    }

    async fn register_account(&self, account: NewAccount) -> Result<(Profile, Employee), StoreError> {
        let NewAccount { password_hash, profile, employee } = account;
        let mut tables = self.tables.write().await;

        let taken = tables.profiles.iter().any(|p| p.email == profile.email)
            || tables.credentials.iter().any(|c| c.username == profile.email);
        if taken {
            return Err(StoreError::conflict("User already exists"));
        }

        let now = Utc::now();
        let credential_id = tables.credentials.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        tables.credentials.push(Credential {
            id: credential_id,
            username: profile.email.clone(),
            password_hash,
        });

        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone: profile.phone,
            role: profile.role,
            employee_number: profile.employee_number,
            created_at: now,
            updated_at: now,
        };
        let employee = Employee {
            id: Uuid::new_v4(),
            profile_id: profile.id,
            department_id: employee.department_id,
            hire_date: employee.hire_date,
            hourly_rate: employee.hourly_rate,
            status: employee.status,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(profile.clone());
        tables.employees.push(employee.clone());
        Ok((profile, employee))
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.profiles, id, |p| p.id).cloned())
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.profiles.clone();
        rows.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(rows)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut tables = self.tables.write().await;
        let previous = by_id(&tables.profiles, profile.id, |p| p.id)
            .map(|p| p.email.clone())
            .ok_or_else(|| StoreError::not_found(format!("profiles {}", profile.id)))?;

        if previous != profile.email {
            let taken = tables
                .profiles
                .iter()
                .any(|p| p.id != profile.id && p.email == profile.email);
            if taken {
                return Err(StoreError::conflict("Email already in use"));
            }
            if let Some(credential) = tables.credentials.iter_mut().find(|c| c.username == previous) {
                credential.username = profile.email.clone();
            }
        }

        let mut row = profile.clone();
        row.updated_at = Utc::now();
        replace(&mut tables.profiles, &row, row.id, |p| p.id, "profiles")
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.departments.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_department(&self, id: Uuid) -> Result<Option<Department>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.departments, id, |d| d.id).cloned())
    }

    async fn create_department(&self, department: NewDepartment) -> Result<Department, StoreError> {
        let now = Utc::now();
        let row = Department {
            id: Uuid::new_v4(),
            name: department.name,
            description: department.description,
            manager_id: department.manager_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.departments.push(row.clone());
        Ok(row)
    }

    async fn update_department(&self, department: &Department) -> Result<Department, StoreError> {
        let mut row = department.clone();
        row.updated_at = Utc::now();
        let mut tables = self.tables.write().await;
        replace(&mut tables.departments, &row, row.id, |d| d.id, "departments")
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.employees.iter().cloned(), |e| e.created_at))
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.employees, id, |e| e.id).cloned())
    }

    async fn get_employee_by_profile(&self, profile_id: Uuid) -> Result<Option<Employee>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.profile_id == profile_id).cloned())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Employee, StoreError> {
        let mut row = employee.clone();
        row.updated_at = Utc::now();
        let mut tables = self.tables.write().await;
        replace(&mut tables.employees, &row, row.id, |e| e.id, "employees")
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.tasks.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut rows = self.list_tasks().await?;
        rows.retain(|t| t.is_active);
        Ok(rows)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.tasks, id, |t| t.id).cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let row = Task {
            id: Uuid::new_v4(),
            name: task.name,
            description: task.description,
            task_type: task.task_type,
            department_id: task.department_id,
            estimated_hours: task.estimated_hours,
            is_active: task.is_active,
            created_by: task.created_by,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.tasks.push(row.clone());
        Ok(row)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut row = task.clone();
        row.updated_at = Utc::now();
        let mut tables = self.tables.write().await;
        replace(&mut tables.tasks, &row, row.id, |t| t.id, "tasks")
    }

    async fn list_work_hours(&self) -> Result<Vec<WorkHour>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.work_hours.iter().cloned(), |w| w.start_time))
    }

    async fn list_work_hours_by_employee(&self, employee_id: Uuid) -> Result<Vec<WorkHour>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.work_hours.iter().filter(|w| w.employee_id == employee_id).cloned();
        Ok(newest_first(rows, |w| w.start_time))
    }

    async fn get_work_hour(&self, id: Uuid) -> Result<Option<WorkHour>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.work_hours, id, |w| w.id).cloned())
    }

    async fn create_work_hour(&self, work_hour: WorkHourDraft) -> Result<WorkHour, StoreError> {
        let row = materialize_work_hour(work_hour, Utc::now());
        self.tables.write().await.work_hours.push(row.clone());
        Ok(row)
    }

    async fn update_work_hour(&self, work_hour: &WorkHour) -> Result<WorkHour, StoreError> {
        let mut row = work_hour.clone();
        row.updated_at = Utc::now();
        let mut tables = self.tables.write().await;
        replace(&mut tables.work_hours, &row, row.id, |w| w.id, "work_hours")
    }

    async fn list_active_sessions(&self) -> Result<Vec<TimeSession>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.time_sessions.iter().filter(|s| s.is_active).cloned();
        Ok(newest_first(rows, |s| s.start_time))
    }

    async fn list_active_sessions_by_employee(&self, employee_id: Uuid) -> Result<Vec<TimeSession>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .time_sessions
            .iter()
            .filter(|s| s.is_active && s.employee_id == employee_id)
            .cloned();
        Ok(newest_first(rows, |s| s.start_time))
    }

    async fn get_time_session(&self, id: Uuid) -> Result<Option<TimeSession>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.time_sessions, id, |s| s.id).cloned())
    }

    async fn create_time_session(&self, session: SessionDraft) -> Result<TimeSession, StoreError> {
        let row = TimeSession {
            id: Uuid::new_v4(),
            employee_id: session.employee_id,
            task_id: session.task_id,
            start_time: session.start_time,
            is_active: true,
            notes: session.notes,
            last_update: Utc::now(),
        };
        self.tables.write().await.time_sessions.push(row.clone());
        Ok(row)
    }

    async fn stop_time_session(&self, id: Uuid, stop: SessionStop) -> Result<(TimeSession, WorkHour), StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let session = tables
            .time_sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found(format!("time_sessions {}", id)))?;
        if !session.is_active {
            return Err(StoreError::conflict("Time session already stopped"));
        }
        session.is_active = false;
        session.last_update = now;
        if let Some(notes) = stop.notes {
            session.notes = Some(notes);
        }
        let session = session.clone();

        let work_hour = materialize_work_hour(stop.work_hour, now);
        tables.work_hours.push(work_hour.clone());
        Ok((session, work_hour))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.projects.iter().cloned(), |p| p.created_at))
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(by_id(&tables.projects, id, |p| p.id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let now = Utc::now();
        let row = Project {
            id: Uuid::new_v4(),
            name: project.name,
            description: project.description,
            department_id: project.department_id,
            manager_id: project.manager_id,
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
            budget: project.budget,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.projects.push(row.clone());
        Ok(row)
    }

    async fn update_project(&self, project: &Project) -> Result<Project, StoreError> {
        let mut row = project.clone();
        row.updated_at = Utc::now();
        let mut tables = self.tables.write().await;
        replace(&mut tables.projects, &row, row.id, |p| p.id, "projects")
    }

    async fn list_overtime_by_employee(&self, employee_id: Uuid) -> Result<Vec<Overtime>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.overtime.iter().filter(|o| o.employee_id == employee_id).cloned();
        Ok(newest_first(rows, |o| o.date))
    }

    async fn list_pending_overtime(&self) -> Result<Vec<Overtime>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .overtime
            .iter()
            .filter(|o| o.status == ApprovalStatus::Pending)
            .cloned();
        Ok(newest_first(rows, |o| o.date))
    }

    async fn create_overtime(&self, overtime: OvertimeDraft) -> Result<Overtime, StoreError> {
        let row = Overtime {
            id: Uuid::new_v4(),
            employee_id: overtime.employee_id,
            date: overtime.date,
            hours: overtime.hours,
            reason: overtime.reason,
            status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        };
        self.tables.write().await.overtime.push(row.clone());
        Ok(row)
    }

    async fn decide_overtime(&self, id: Uuid, decision: ApprovalDecision) -> Result<Overtime, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .overtime
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found(format!("overtime {}", id)))?;
        if row.status != ApprovalStatus::Pending {
            return Err(StoreError::conflict("Overtime request already decided"));
        }
        row.status = decision.status;
        row.approved_by = Some(decision.approved_by);
        row.approved_at = Some(decision.approved_at);
        Ok(row.clone())
    }

    async fn list_leave_requests_by_employee(&self, employee_id: Uuid) -> Result<Vec<LeaveRequest>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .leave_requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned();
        Ok(newest_first(rows, |r| r.created_at))
    }

    async fn list_pending_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .leave_requests
            .iter()
            .filter(|r| r.status == ApprovalStatus::Pending)
            .cloned();
        Ok(newest_first(rows, |r| r.created_at))
    }

    async fn create_leave_request(&self, request: LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let now = Utc::now();
        let row = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: request.employee_id,
            leave_type: request.leave_type,
            start_date: request.start_date,
            end_date: request.end_date,
            days: request.days,
            reason: request.reason,
            status: ApprovalStatus::Pending,
            approved_by: None,
            approved_at: None,
            comments: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.leave_requests.push(row.clone());
        Ok(row)
    }

    async fn decide_leave_request(&self, id: Uuid, decision: ApprovalDecision) -> Result<LeaveRequest, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .leave_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found(format!("leave_requests {}", id)))?;
        if row.status != ApprovalStatus::Pending {
            return Err(StoreError::conflict("Leave request already decided"));
        }
        row.status = decision.status;
        row.approved_by = Some(decision.approved_by);
        row.approved_at = Some(decision.approved_at);
        if decision.comments.is_some() {
            row.comments = decision.comments;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn get_attendance(&self, employee_id: Uuid, date: NaiveDate) -> Result<Option<Attendance>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .attendance
            .iter()
            .find(|a| a.employee_id == employee_id && a.date == date)
            .cloned())
    }

    async fn clock_in(&self, employee_id: Uuid, date: NaiveDate, at: DateTime<Utc>) -> Result<Attendance, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.attendance.iter().any(|a| a.employee_id == employee_id && a.date == date) {
            return Err(StoreError::conflict("Already clocked in today"));
        }
        let now = Utc::now();
        let row = Attendance {
            id: Uuid::new_v4(),
            employee_id,
            date,
            clock_in: Some(at),
            clock_out: None,
            total_hours: None,
            status: AttendanceStatus::Present,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        tables.attendance.push(row.clone());
        Ok(row)
    }

    async fn clock_out(&self, id: Uuid, clock_out: ClockOut) -> Result<Attendance, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .attendance
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found(format!("attendance {}", id)))?;
        if row.clock_out.is_some() {
            return Err(StoreError::conflict("Already clocked out today"));
        }
        row.clock_out = Some(clock_out.at);
        row.total_hours = Some(clock_out.total_hours);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

fn materialize_work_hour(draft: WorkHourDraft, now: DateTime<Utc>) -> WorkHour {
    WorkHour {
        id: Uuid::new_v4(),
        employee_id: draft.employee_id,
        task_id: draft.task_id,
        start_time: draft.start_time,
        end_time: draft.end_time,
        break_time_minutes: draft.break_time_minutes,
        total_hours: draft.total_hours,
        notes: draft.notes,
        status: draft.status,
        approved_by: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
    }
}
