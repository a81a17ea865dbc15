mod common;

use anyhow::Result;
use chrono::{Datelike, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{id_of, TestServer};

#[tokio::test]
async fn approved_vacation_draws_down_balance() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let manager = server.manager().await?;
    let year = Utc::now().year();

    let res = server
        .post(&worker, "/api/leave-requests")
        .json(&json!({
            "type": "vacation",
            "startDate": format!("{}-03-04", year),
            "endDate": format!("{}-03-08", year),
            "reason": "Trip",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let request: Value = res.json().await?;
    assert_eq!(request["status"], "pending");
    assert_eq!(request["days"], 5);

    let team: Vec<Value> = server
        .get(&manager, "/api/leave-requests?filter=team")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(team.len(), 1);

    let res = server
        .post(&manager, &format!("/api/leave-requests/{}/approve", id_of(&request)?))
        .json(&json!({ "comments": "Enjoy" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let approved: Value = res.json().await?;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["comments"], "Enjoy");

    let balance: Value = server.get(&worker, "/api/leave-balance").send().await?.json().await?;
    assert_eq!(balance["vacation"], 20);
    assert_eq!(balance["sick"], 5);
    assert_eq!(balance["compTime"], 8);
    Ok(())
}

#[tokio::test]
async fn decided_requests_cannot_be_decided_again() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let admin = server.admin().await?;

    let request: Value = server
        .post(&worker, "/api/leave-requests")
        .json(&json!({ "type": "sick", "startDate": "2024-02-01", "endDate": "2024-02-01" }))
        .send()
        .await?
        .json()
        .await?;
    let id = id_of(&request)?;

    let res = server.post(&admin, &format!("/api/leave-requests/{}/reject", id)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = server.post(&admin, &format!("/api/leave-requests/{}/approve", id)).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn employees_cannot_approve_leave() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;

    let request: Value = server
        .post(&worker, "/api/leave-requests")
        .json(&json!({ "type": "personal", "startDate": "2024-02-01", "endDate": "2024-02-02" }))
        .send()
        .await?
        .json()
        .await?;
    let res = server
        .post(&worker, &format!("/api/leave-requests/{}/approve", id_of(&request)?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Only admins and managers can approve leave requests");

    // The team view falls back to the caller's own list.
    let own: Vec<Value> = server
        .get(&worker, "/api/leave-requests?filter=team")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(own.len(), 1);
    Ok(())
}

#[tokio::test]
async fn leave_end_before_start_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let res = server
        .post(&worker, "/api/leave-requests")
        .json(&json!({ "type": "vacation", "startDate": "2024-02-05", "endDate": "2024-02-01" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn overtime_flows_through_manager_approval() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let manager = server.manager().await?;

    let res = server
        .post(&worker, "/api/overtime")
        .json(&json!({ "date": "2024-05-06", "hours": "2.5", "reason": "Late truck" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let overtime: Value = res.json().await?;
    assert_eq!(overtime["status"], "pending");

    let res = server
        .post(&worker, &format!("/api/overtime/{}/approve", id_of(&overtime)?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let pending: Vec<Value> = server
        .get(&manager, "/api/overtime?filter=team")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(pending.len(), 1);

    let res = server
        .post(&manager, &format!("/api/overtime/{}/approve", id_of(&overtime)?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let approved: Value = res.json().await?;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approvedBy"].as_str(), Some(manager.profile_id.as_str()));
    Ok(())
}

#[tokio::test]
async fn overtime_hours_must_be_positive() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;
    let res = server
        .post(&worker, "/api/overtime")
        .json(&json!({ "date": "2024-05-06", "hours": "0" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
