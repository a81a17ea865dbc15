mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

#[tokio::test]
async fn partial_update_keeps_other_fields() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("worker@example.com").await?;

    let res = server
        .put(&worker, "/api/profiles/me")
        .json(&json!({ "phone": "+31 6 1234 5678" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await?;
    assert_eq!(profile["phone"], "+31 6 1234 5678");
    assert_eq!(profile["firstName"], "Test");
    assert_eq!(profile["lastName"], "Employee");
    assert_eq!(profile["email"], "worker@example.com");
    assert_eq!(profile["role"], "employee");
    Ok(())
}

#[tokio::test]
async fn email_change_moves_the_login() -> Result<()> {
    let server = TestServer::start().await?;
    let worker = server.register("old@example.com").await?;

    let res = server
        .put(&worker, "/api/profiles/me")
        .json(&json!({ "email": "New@Example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = res.json().await?;
    assert_eq!(profile["email"], "new@example.com");

    let relogged = server.login("new@example.com", PASSWORD).await?;
    assert_eq!(relogged.profile_id, worker.profile_id);

    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "old@example.com", "password": PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn taken_email_is_409() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("taken@example.com").await?;
    let worker = server.register("worker@example.com").await?;

    let res = server
        .put(&worker, "/api/profiles/me")
        .json(&json!({ "email": "taken@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let me: Value = server.get(&worker, "/api/profiles/me").send().await?.json().await?;
    assert_eq!(me["email"], "worker@example.com");
    Ok(())
}

#[tokio::test]
async fn email_case_is_ignored() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("Mixed@Example.com").await?;

    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "email": "mixed@example.com",
            "password": PASSWORD,
            "firstName": "Second",
            "lastName": "Try",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let session = server.login("MIXED@example.COM", PASSWORD).await?;
    assert_eq!(session.email, "mixed@example.com");
    Ok(())
}
