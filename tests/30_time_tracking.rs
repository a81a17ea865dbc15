mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{decimal, id_of, TestServer};

#[tokio::test]
async fn starting_twice_creates_two_sessions() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Picking").await?;

    for _ in 0..2 {
        let res = server
            .post(&worker, "/api/time-sessions")
            .json(&json!({ "taskId": task }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let mine: Vec<Value> = server
        .get(&worker, "/api/time-sessions?filter=active")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|s| s["isActive"] == true));
    assert!(mine.iter().all(|s| s.get("elapsedHours").is_some()));
    Ok(())
}

#[tokio::test]
async fn stop_books_net_hours_once() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Loading").await?;

    let session: Value = server
        .post(&worker, "/api/time-sessions")
        .json(&json!({ "taskId": task, "startTime": "2024-05-06T08:00:00Z" }))
        .send()
        .await?
        .json()
        .await?;
    let id = id_of(&session)?;

    let res = server
        .post(&worker, &format!("/api/time-sessions/{}/stop", id))
        .json(&json!({ "endTime": "2024-05-06T09:30:00Z", "breakTimeMinutes": 15 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["session"]["isActive"], false);
    assert_eq!(body["workHour"]["status"], "completed");
    assert_eq!(decimal(&body["workHour"]["totalHours"]), 1.25);

    let again = server
        .post(&worker, &format!("/api/time-sessions/{}/stop", id))
        .json(&json!({ "endTime": "2024-05-06T10:00:00Z" }))
        .send()
        .await?;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let hours: Vec<Value> = server.get(&worker, "/api/work-hours").send().await?.json().await?;
    assert_eq!(hours.len(), 1);
    Ok(())
}

#[tokio::test]
async fn stop_rejects_break_longer_than_session() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Sorting").await?;

    let session: Value = server
        .post(&worker, "/api/time-sessions")
        .json(&json!({ "taskId": task, "startTime": "2024-05-06T08:00:00Z" }))
        .send()
        .await?
        .json()
        .await?;
    let res = server
        .post(&worker, &format!("/api/time-sessions/{}/stop", id_of(&session)?))
        .json(&json!({ "endTime": "2024-05-06T08:10:00Z", "breakTimeMinutes": 30 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn other_employees_sessions_are_hidden() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let owner = server.register("owner@example.com").await?;
    let other = server.register("other@example.com").await?;
    let task = server.task(&admin, "Cleaning").await?;

    let session: Value = server
        .post(&owner, "/api/time-sessions")
        .json(&json!({ "taskId": task }))
        .send()
        .await?
        .json()
        .await?;
    let res = server
        .post(&other, &format!("/api/time-sessions/{}/stop", id_of(&session)?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_task_is_404() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let res = server
        .post(&worker, "/api/time-sessions")
        .json(&json!({ "taskId": "00000000-0000-0000-0000-000000000000" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn work_hour_totals_are_server_computed() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Inventory").await?;

    let res = server
        .post(&worker, "/api/work-hours")
        .json(&json!({
            "taskId": task,
            "startTime": "2024-05-06T08:00:00Z",
            "endTime": "2024-05-06T12:00:00Z",
            "breakTimeMinutes": 30,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await?;
    assert_eq!(decimal(&row["totalHours"]), 3.5);
    let id = id_of(&row)?;

    let res = server
        .put(&worker, &format!("/api/work-hours/{}", id))
        .json(&json!({ "breakTimeMinutes": 60 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await?;
    assert_eq!(decimal(&row["totalHours"]), 3.0);

    // Employees cannot approve their own hours.
    let res = server
        .put(&worker, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .put(&admin, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await?;
    assert_eq!(row["status"], "approved");
    assert!(row["approvedBy"].is_string());
    Ok(())
}

#[tokio::test]
async fn managers_approve_other_employees_hours() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let manager = server.manager().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Dispatch").await?;

    let row: Value = server
        .post(&worker, "/api/work-hours")
        .json(&json!({
            "taskId": task,
            "startTime": "2024-05-06T08:00:00Z",
            "endTime": "2024-05-06T10:00:00Z",
            "status": "pending_approval",
        }))
        .send()
        .await?
        .json()
        .await?;
    let id = id_of(&row)?;

    let team: Vec<Value> = server
        .get(&manager, "/api/work-hours?filter=team")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(team.len(), 1);

    // Reviewing is status-only; other edits stay private to the owner.
    let res = server
        .put(&manager, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved", "breakTimeMinutes": 30 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .put(&manager, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await?;
    assert_eq!(row["status"], "approved");
    assert_eq!(row["approvedBy"].as_str(), Some(manager.profile_id.as_str()));
    assert!(row["approvedAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn managers_cannot_approve_their_own_hours() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let manager = server.manager().await?;
    let task = server.task(&admin, "Audit").await?;

    let res = server
        .post(&manager, "/api/work-hours")
        .json(&json!({
            "taskId": task,
            "startTime": "2024-05-06T08:00:00Z",
            "endTime": "2024-05-06T10:00:00Z",
            "status": "approved",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Cannot approve your own work hours");

    let row: Value = server
        .post(&manager, "/api/work-hours")
        .json(&json!({
            "taskId": task,
            "startTime": "2024-05-06T08:00:00Z",
            "endTime": "2024-05-06T10:00:00Z",
        }))
        .send()
        .await?
        .json()
        .await?;
    let res = server
        .put(&manager, &format!("/api/work-hours/{}", id_of(&row)?))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn editing_approved_hours_withdraws_the_approval() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin().await?;
    let worker = server.register("worker@example.com").await?;
    let task = server.task(&admin, "Receiving").await?;

    let row: Value = server
        .post(&worker, "/api/work-hours")
        .json(&json!({
            "taskId": task,
            "startTime": "2024-05-06T08:00:00Z",
            "endTime": "2024-05-06T10:00:00Z",
        }))
        .send()
        .await?
        .json()
        .await?;
    let id = id_of(&row)?;
    let res = server
        .put(&admin, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .put(&worker, &format!("/api/work-hours/{}", id))
        .json(&json!({ "endTime": "2024-05-06T20:00:00Z" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await?;
    assert_eq!(row["status"], "pending_approval");
    assert_eq!(decimal(&row["totalHours"]), 12.0);
    assert!(row["approvedBy"].is_null());
    assert!(row["approvedAt"].is_null());

    // Moving off `approved` clears the stamp too.
    server
        .put(&admin, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    let res = server
        .put(&admin, &format!("/api/work-hours/{}", id))
        .json(&json!({ "status": "completed" }))
        .send()
        .await?;
    let row: Value = res.json().await?;
    assert_eq!(row["status"], "completed");
    assert!(row["approvedBy"].is_null());
    Ok(())
}
