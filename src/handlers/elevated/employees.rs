use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::ValidatedJson;
use crate::database::models::{Employee, EmployeePatch};
use crate::error::ApiError;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::not_found("Employee not found")
}

/// GET /api/employees - Newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.store.list_employees().await?))
}

/// GET /api/employees/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Employee>, ApiError> {
    state.store.get_employee(id).await?.map(Json).ok_or_else(not_found)
}

/// PUT /api/employees/:id - Department, rate, status and emergency contact
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<EmployeePatch>,
) -> Result<Json<Employee>, ApiError> {
    let mut employee = state.store.get_employee(id).await?.ok_or_else(not_found)?;
    if let Some(department_id) = patch.department_id {
        if state.store.get_department(department_id).await?.is_none() {
            return Err(ApiError::not_found("Department not found"));
        }
    }
    patch.apply_to(&mut employee);
    Ok(Json(state.store.update_employee(&employee).await?))
}
