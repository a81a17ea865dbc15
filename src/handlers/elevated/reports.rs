use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::error::ApiError;
use crate::services::reports::{build_report, ReportInput, ReportRange, ReportSummary};
use crate::AppState;

/// GET /api/reports/summary?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<ReportRange>, QueryRejection>,
) -> Result<Json<ReportSummary>, ApiError> {
    let Query(range) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if let (Some(start), Some(end)) = (range.start_date, range.end_date) {
        if end < start {
            return Err(ApiError::bad_request("endDate must not be before startDate"));
        }
    }

    let work_hours = state.store.list_work_hours().await?;
    let tasks = state.store.list_tasks().await?;
    let employees = state.store.list_employees().await?;
    let profiles = state.store.list_profiles().await?;

    let report = build_report(
        ReportInput {
            work_hours: &work_hours,
            tasks: &tasks,
            employees: &employees,
            profiles: &profiles,
        },
        range,
    );
    Ok(Json(report))
}
