#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use workforce_api::auth::JwtKeys;
use workforce_api::config::{AppConfig, DEV_JWT_SECRET};
use workforce_api::database::models::Role;
use workforce_api::database::MemoryStore;
use workforce_api::services::accounts::{create_account, AccountRequest};
use workforce_api::{app, AppState};

pub const PASSWORD: &str = "correct horse battery";

/// An in-process server over a fresh in-memory store. Each test gets its
/// own instance on its own runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

/// Token plus identifiers for a logged-in account
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub profile_id: String,
    pub email: String,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            jwt: JwtKeys::new(DEV_JWT_SECRET, config.security.jwt_expiry_hours)?,
            config: Arc::new(config),
        };

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&session.token)
    }

    pub fn post(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&session.token)
    }

    pub fn put(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&session.token)
    }

    pub fn patch(&self, session: &Session, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path)).bearer_auth(&session.token)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        session_from(res.json().await?)
    }

    /// Self-registration always yields an employee-role account.
    pub async fn register(&self, email: &str) -> Result<Session> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "email": email,
                "password": PASSWORD,
                "firstName": "Test",
                "lastName": "Employee",
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
        session_from(res.json().await?)
    }

    /// Creates an account with `role` directly in the store, then logs in.
    pub async fn account_with_role(&self, email: &str, role: Role) -> Result<Session> {
        create_account(
            self.state.store.as_ref(),
            AccountRequest {
                email,
                password: PASSWORD,
                first_name: "Test",
                last_name: "Account",
                role,
            },
        )
        .await?;
        self.login(email, PASSWORD).await
    }

    pub async fn admin(&self) -> Result<Session> {
        self.account_with_role("admin@example.com", Role::Admin).await
    }

    pub async fn manager(&self) -> Result<Session> {
        self.account_with_role("manager@example.com", Role::Manager).await
    }

    /// Creates a task as admin and returns its id.
    pub async fn task(&self, admin: &Session, name: &str) -> Result<String> {
        let res = self
            .post(admin, "/api/tasks")
            .json(&json!({ "name": name, "type": "warehouse" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "task create failed: {}", res.status());
        let body: Value = res.json().await?;
        id_of(&body)
    }
}

fn session_from(body: Value) -> Result<Session> {
    Ok(Session {
        token: body["token"].as_str().context("missing token")?.to_string(),
        profile_id: body["user"]["id"].as_str().context("missing user.id")?.to_string(),
        email: body["user"]["email"].as_str().context("missing user.email")?.to_string(),
    })
}

pub fn id_of(body: &Value) -> Result<String> {
    Ok(body["id"].as_str().context("missing id")?.to_string())
}

/// Decimal fields serialize as strings.
pub fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap_or(f64::NAN),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
