mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{decimal, TestServer};

#[tokio::test]
async fn summary_aggregates_hours_in_range() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Picking").await?;

    // In-progress rows are not reported.
    server
        .post(&worker, "/api/work-hours")
        .json(&json!({ "taskId": task, "startTime": "2024-05-08T08:00:00Z", "endTime": "2024-05-08T09:00:00Z" }))
        .send()
        .await?;

    for (start, end) in [
        ("2024-05-06T08:00:00Z", "2024-05-06T10:00:00Z"),
        ("2024-05-07T08:00:00Z", "2024-05-07T09:30:00Z"),
        ("2024-06-01T08:00:00Z", "2024-06-01T12:00:00Z"),
    ] {
        let res = server
            .post(&worker, "/api/work-hours")
            .json(&json!({ "taskId": task, "startTime": start, "endTime": end, "status": "completed" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = server
        .get(&admin, "/api/reports/summary?startDate=2024-05-01&endDate=2024-05-31")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let report: Value = res.json().await?;
    assert_eq!(decimal(&report["totalHours"]), 3.5);
    assert_eq!(report["totalTasks"], 1);
    assert_eq!(report["totalEmployees"], 2);
    assert_eq!(report["productivityByTask"][0]["count"], 2);
    assert_eq!(report["productivityByTask"][0]["task"], "Picking");
    assert_eq!(report["dailyHours"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["employeeStats"][0]["name"], "Test Employee");
    Ok(())
}

#[tokio::test]
async fn summary_is_admin_only_and_checks_the_range() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;

    let res = server.get(&worker, "/api/reports/summary").send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .get(&admin, "/api/reports/summary?startDate=2024-05-31&endDate=2024-05-01")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "endDate must not be before startDate");

    let res = server.get(&admin, "/api/reports/summary?startDate=yesterday").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
