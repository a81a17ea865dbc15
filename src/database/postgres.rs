use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{conflict_on_unique, StoreError};
use crate::database::models::*;
use crate::database::store::{
    ApprovalDecision, ClockOut, LeaveDraft, NewAccount, OvertimeDraft, SessionDraft, Store,
};

/// sqlx-backed store over the schema in `sql/schema.sql`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, table: &'static str, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", table);
        let found: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(found)
    }

    /// Resolves a guarded update that matched nothing into NotFound or Conflict.
    async fn guard_failure(&self, table: &'static str, id: Uuid, conflict: &str) -> StoreError {
        match self.exists(table, id).await {
            Ok(true) => StoreError::conflict(conflict),
            Ok(false) => StoreError::not_found(format!("{} {}", table, id)),
            Err(err) => err,
        }
    }
}

fn found<T>(row: Option<T>, table: &str, id: Uuid) -> Result<T, StoreError> {
    row.ok_or_else(|| StoreError::not_found(format!("{} {}", table, id)))
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, Credential>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn register_account(&self, account: NewAccount) -> Result<(Profile, Employee), StoreError> {
        let NewAccount { password_hash, profile, employee } = account;
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(&profile.email)
            .bind(&password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "User already exists"))?;

        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (user_id, email, first_name, last_name, phone, role, employee_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(profile.user_id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(profile.role)
        .bind(&profile.employee_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "User already exists"))?;

        let employee = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (profile_id, department_id, hire_date, hourly_rate, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(profile.id)
        .bind(employee.department_id)
        .bind(employee.hire_date)
        .bind(employee.hourly_rate)
        .bind(employee.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((profile, employee))
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY last_name, first_name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT email FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(profile.id)
                .fetch_optional(&mut *tx)
                .await?;
        let previous = found(previous, "profiles", profile.id)?;

        let updated = sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET email = $2, first_name = $3, last_name = $4, phone = $5, \
             role = $6, employee_number = $7, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(profile.role)
        .bind(&profile.employee_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))?;

        if previous != updated.email {
            sqlx::query("UPDATE users SET username = $2 WHERE username = $1")
                .bind(&previous)
                .bind(&updated.email)
                .execute(&mut *tx)
                .await
                .map_err(|e| conflict_on_unique(e, "Email already in use"))?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_department(&self, id: Uuid) -> Result<Option<Department>, StoreError> {
        let row = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_department(&self, department: NewDepartment) -> Result<Department, StoreError> {
        let row = sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, description, manager_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&department.name)
        .bind(&department.description)
        .bind(department.manager_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_department(&self, department: &Department) -> Result<Department, StoreError> {
        let row = sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2, description = $3, manager_id = $4, updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.description)
        .bind(department.manager_id)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "departments", department.id)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let rows = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_employee_by_profile(&self, profile_id: Uuid) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Employee, StoreError> {
        let row = sqlx::query_as::<_, Employee>(
            "UPDATE employees SET department_id = $2, hire_date = $3, hourly_rate = $4, status = $5, \
             emergency_contact_name = $6, emergency_contact_phone = $7, updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(employee.id)
        .bind(employee.department_id)
        .bind(employee.hire_date)
        .bind(employee.hourly_rate)
        .bind(employee.status)
        .bind(&employee.emergency_contact_name)
        .bind(&employee.emergency_contact_phone)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "employees", employee.id)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE is_active ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (name, description, type, department_id, estimated_hours, is_active, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.task_type)
        .bind(task.department_id)
        .bind(task.estimated_hours)
        .bind(task.is_active)
        .bind(task.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET name = $2, description = $3, type = $4, department_id = $5, \
             estimated_hours = $6, is_active = $7, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.task_type)
        .bind(task.department_id)
        .bind(task.estimated_hours)
        .bind(task.is_active)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "tasks", task.id)
    }

    async fn list_work_hours(&self) -> Result<Vec<WorkHour>, StoreError> {
        let rows = sqlx::query_as::<_, WorkHour>("SELECT * FROM work_hours ORDER BY start_time DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_work_hours_by_employee(&self, employee_id: Uuid) -> Result<Vec<WorkHour>, StoreError> {
        let rows = sqlx::query_as::<_, WorkHour>(
            "SELECT * FROM work_hours WHERE employee_id = $1 ORDER BY start_time DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_work_hour(&self, id: Uuid) -> Result<Option<WorkHour>, StoreError> {
        let row = sqlx::query_as::<_, WorkHour>("SELECT * FROM work_hours WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_work_hour(&self, work_hour: WorkHourDraft) -> Result<WorkHour, StoreError> {
        let row = insert_work_hour(&work_hour).fetch_one(&self.pool).await?;
        Ok(row)
    }

    async fn update_work_hour(&self, work_hour: &WorkHour) -> Result<WorkHour, StoreError> {
        let row = sqlx::query_as::<_, WorkHour>(
            "UPDATE work_hours SET task_id = $2, start_time = $3, end_time = $4, break_time_minutes = $5, \
             total_hours = $6, notes = $7, status = $8, approved_by = $9, approved_at = $10, \
             updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(work_hour.id)
        .bind(work_hour.task_id)
        .bind(work_hour.start_time)
        .bind(work_hour.end_time)
        .bind(work_hour.break_time_minutes)
        .bind(work_hour.total_hours)
        .bind(&work_hour.notes)
        .bind(work_hour.status)
        .bind(work_hour.approved_by)
        .bind(work_hour.approved_at)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "work_hours", work_hour.id)
    }

    async fn list_active_sessions(&self) -> Result<Vec<TimeSession>, StoreError> {
        let rows = sqlx::query_as::<_, TimeSession>(
            "SELECT * FROM time_sessions WHERE is_active ORDER BY start_time DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_active_sessions_by_employee(&self, employee_id: Uuid) -> Result<Vec<TimeSession>, StoreError> {
        let rows = sqlx::query_as::<_, TimeSession>(
            "SELECT * FROM time_sessions WHERE employee_id = $1 AND is_active ORDER BY start_time DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_time_session(&self, id: Uuid) -> Result<Option<TimeSession>, StoreError> {
        let row = sqlx::query_as::<_, TimeSession>("SELECT * FROM time_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_time_session(&self, session: SessionDraft) -> Result<TimeSession, StoreError> {
        let row = sqlx::query_as::<_, TimeSession>(
            "INSERT INTO time_sessions (employee_id, task_id, start_time, notes) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(session.employee_id)
        .bind(session.task_id)
        .bind(session.start_time)
        .bind(&session.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn stop_time_session(&self, id: Uuid, stop: SessionStop) -> Result<(TimeSession, WorkHour), StoreError> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, TimeSession>(
            "UPDATE time_sessions SET is_active = false, notes = COALESCE($2, notes), last_update = now() \
             WHERE id = $1 AND is_active RETURNING *",
        )
        .bind(id)
        .bind(&stop.notes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(session) = session else {
            tx.rollback().await?;
            return Err(self.guard_failure("time_sessions", id, "Time session already stopped").await);
        };

        let work_hour = insert_work_hour(&stop.work_hour).fetch_one(&mut *tx).await?;

        tx.commit().await?;
        Ok((session, work_hour))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError> {
        let row = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, description, department_id, manager_id, start_date, end_date, status, budget) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.department_id)
        .bind(project.manager_id)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .bind(project.budget)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_project(&self, project: &Project) -> Result<Project, StoreError> {
        let row = sqlx::query_as::<_, Project>(
            "UPDATE projects SET name = $2, description = $3, department_id = $4, manager_id = $5, \
             start_date = $6, end_date = $7, status = $8, budget = $9, updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.department_id)
        .bind(project.manager_id)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .bind(project.budget)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "projects", project.id)
    }

    async fn list_overtime_by_employee(&self, employee_id: Uuid) -> Result<Vec<Overtime>, StoreError> {
        let rows = sqlx::query_as::<_, Overtime>(
            "SELECT * FROM overtime WHERE employee_id = $1 ORDER BY date DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_pending_overtime(&self) -> Result<Vec<Overtime>, StoreError> {
        let rows = sqlx::query_as::<_, Overtime>(
            "SELECT * FROM overtime WHERE status = 'pending' ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_overtime(&self, overtime: OvertimeDraft) -> Result<Overtime, StoreError> {
        let row = sqlx::query_as::<_, Overtime>(
            "INSERT INTO overtime (employee_id, date, hours, reason) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(overtime.employee_id)
        .bind(overtime.date)
        .bind(overtime.hours)
        .bind(&overtime.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn decide_overtime(&self, id: Uuid, decision: ApprovalDecision) -> Result<Overtime, StoreError> {
        let row = sqlx::query_as::<_, Overtime>(
            "UPDATE overtime SET status = $2, approved_by = $3, approved_at = $4 \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(decision.status)
        .bind(decision.approved_by)
        .bind(decision.approved_at)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row),
            None => Err(self.guard_failure("overtime", id, "Overtime request already decided").await),
        }
    }

    async fn list_leave_requests_by_employee(&self, employee_id: Uuid) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE employee_id = $1 ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_pending_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE status = 'pending' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_leave_request(&self, request: LeaveDraft) -> Result<LeaveRequest, StoreError> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            "INSERT INTO leave_requests (employee_id, type, start_date, end_date, days, reason) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(request.employee_id)
        .bind(request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.days)
        .bind(&request.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn decide_leave_request(&self, id: Uuid, decision: ApprovalDecision) -> Result<LeaveRequest, StoreError> {
        let row = sqlx::query_as::<_, LeaveRequest>(
            "UPDATE leave_requests SET status = $2, approved_by = $3, approved_at = $4, \
             comments = COALESCE($5, comments), updated_at = now() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(decision.status)
        .bind(decision.approved_by)
        .bind(decision.approved_at)
        .bind(&decision.comments)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row),
            None => Err(self.guard_failure("leave_requests", id, "Leave request already decided").await),
        }
    }

    async fn get_attendance(&self, employee_id: Uuid, date: NaiveDate) -> Result<Option<Attendance>, StoreError> {
        let row = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE employee_id = $1 AND date = $2",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn clock_in(&self, employee_id: Uuid, date: NaiveDate, at: DateTime<Utc>) -> Result<Attendance, StoreError> {
        let row = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendance (employee_id, date, clock_in) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(employee_id)
        .bind(date)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Already clocked in today"))?;
        Ok(row)
    }

    async fn clock_out(&self, id: Uuid, clock_out: ClockOut) -> Result<Attendance, StoreError> {
        let row = sqlx::query_as::<_, Attendance>(
            "UPDATE attendance SET clock_out = $2, total_hours = $3, updated_at = now() \
             WHERE id = $1 AND clock_out IS NULL RETURNING *",
        )
        .bind(id)
        .bind(clock_out.at)
        .bind(clock_out.total_hours)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row),
            None => Err(self.guard_failure("attendance", id, "Already clocked out today").await),
        }
    }
}

fn insert_work_hour(
    work_hour: &WorkHourDraft,
) -> sqlx::query::QueryAs<'_, sqlx::Postgres, WorkHour, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, WorkHour>(
        "INSERT INTO work_hours (employee_id, task_id, start_time, end_time, break_time_minutes, total_hours, notes, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(work_hour.employee_id)
    .bind(work_hour.task_id)
    .bind(work_hour.start_time)
    .bind(work_hour.end_time)
    .bind(work_hour.break_time_minutes)
    .bind(work_hour.total_hours)
    .bind(&work_hour.notes)
    .bind(work_hour.status)
}
