use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::check_date_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_project_dates"))]
pub struct NewProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    pub budget: Option<Decimal>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Active
}

fn validate_new_project_dates(project: &NewProject) -> Result<(), ValidationError> {
    match (project.start_date, project.end_date) {
        (Some(start), Some(end)) => check_date_range(start, end),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub budget: Option<Decimal>,
}

impl ProjectPatch {
    pub fn apply_to(self, project: &mut Project) {
        if let Some(v) = self.name {
            project.name = v;
        }
        if let Some(v) = self.description {
            project.description = Some(v);
        }
        if let Some(v) = self.department_id {
            project.department_id = Some(v);
        }
        if let Some(v) = self.manager_id {
            project.manager_id = Some(v);
        }
        if let Some(v) = self.start_date {
            project.start_date = Some(v);
        }
        if let Some(v) = self.end_date {
            project.end_date = Some(v);
        }
        if let Some(v) = self.status {
            project.status = v;
        }
        if let Some(v) = self.budget {
            project.budget = Some(v);
        }
    }
}
