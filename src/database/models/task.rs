use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Warehouse,
    Logistics,
    Maintenance,
    Administrative,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub task_type: TaskType,
    pub department_id: Option<Uuid>,
    pub estimated_hours: Option<Decimal>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub department_id: Option<Uuid>,
    pub estimated_hours: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Set from the caller's profile, never from the body.
    #[serde(skip)]
    pub created_by: Option<Uuid>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub department_id: Option<Uuid>,
    pub estimated_hours: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl TaskPatch {
    pub fn apply_to(self, task: &mut Task) {
        if let Some(v) = self.name {
            task.name = v;
        }
        if let Some(v) = self.description {
            task.description = Some(v);
        }
        if let Some(v) = self.task_type {
            task.task_type = v;
        }
        if let Some(v) = self.department_id {
            task.department_id = Some(v);
        }
        if let Some(v) = self.estimated_hours {
            task.estimated_hours = Some(v);
        }
        if let Some(v) = self.is_active {
            task.is_active = v;
        }
    }
}
