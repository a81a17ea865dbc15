use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use auth::JwtKeys;
use config::{AppConfig, DatabaseConfig, SecurityConfig};
use database::{MemoryStore, PgStore, Store, StoreError};

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

/// Postgres when a database URL is configured, otherwise the in-memory store.
pub async fn store_from_config(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.url {
        Some(_) => {
            let pool = database::connect(config).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // JWT required; elevated routes additionally require the admin role
        .merge(
            protected_routes()
                .merge(elevated_routes().route_layer(from_fn(middleware::require_admin)))
                .route_layer(from_fn_with_state(state.clone(), middleware::jwt_auth_middleware)),
        )
        .with_state(state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        Some(CorsLayer::permissive())
    } else {
        Some(
            CorsLayer::permissive().allow_origin(AllowOrigin::list(origins)),
        )
    }
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/register", post(auth::register_post))
}

fn protected_routes() -> Router<AppState> {
    use handlers::protected::*;

    Router::new()
        .route("/api/profiles/me", get(profiles::me).put(profiles::update_me))
        .route("/api/departments", get(departments::list))
        .route("/api/departments/:id", get(departments::show))
        .route("/api/tasks", get(tasks::list))
        .route("/api/tasks/:id", get(tasks::show))
        .route("/api/work-hours", get(work_hours::list).post(work_hours::create))
        .route("/api/work-hours/:id", get(work_hours::show).put(work_hours::update))
        .route("/api/time-sessions", get(time_sessions::list).post(time_sessions::create))
        .route("/api/time-sessions/:id/stop", post(time_sessions::stop))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/projects/:id", get(projects::show).patch(projects::update))
        .route("/api/leave-requests", get(leave_requests::list).post(leave_requests::create))
        .route("/api/leave-requests/:id/approve", post(leave_requests::approve))
        .route("/api/leave-requests/:id/reject", post(leave_requests::reject))
        .route("/api/leave-balance", get(leave_balance::show))
        .route("/api/attendance/today", get(attendance::today))
        .route("/api/attendance/clock-in", post(attendance::clock_in))
        .route("/api/attendance/clock-out", post(attendance::clock_out))
        .route("/api/overtime", get(overtime::list).post(overtime::create))
        .route("/api/overtime/:id/approve", post(overtime::approve))
        .route("/api/overtime/:id/reject", post(overtime::reject))
}

fn elevated_routes() -> Router<AppState> {
    use handlers::elevated::*;

    Router::new()
        .route("/api/departments", post(departments::create))
        .route("/api/departments/:id", put(departments::update))
        .route("/api/employees", get(employees::list))
        .route("/api/employees/:id", get(employees::show).put(employees::update))
        .route("/api/profiles/:id/role", put(profiles::update_role))
        .route("/api/tasks", post(tasks::create))
        .route("/api/tasks/:id", put(tasks::update))
        .route("/api/reports/summary", get(reports::summary))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Workforce API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/auth/login, /api/auth/register (public)",
            "api": "/api/* (bearer token)",
            "admin": "/api/employees, /api/reports/summary, writes to departments and tasks (admin)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state() -> AppState {
        let config = AppConfig::development();
        AppState {
            store: Arc::new(MemoryStore::new()),
            jwt: JwtKeys::new(config::DEV_JWT_SECRET, 1).unwrap(),
            config: Arc::new(config),
        }
    }

    async fn get(path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(path);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        let response = app(state())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_reports_store_ok() {
        let (status, body) = get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn root_is_public() {
        let (status, body) = get("/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn api_requires_a_token() {
        let (status, body) = get("/api/tasks", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token required");

        let (status, _) = get("/api/tasks", Some("garbage")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn wildcard_origin_is_permissive() {
        let mut security = AppConfig::development().security;
        security.cors_origins = vec!["*".to_string()];
        assert!(cors_layer(&security).is_some());

        security.enable_cors = false;
        assert!(cors_layer(&security).is_none());
    }
}
