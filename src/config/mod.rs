use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Signing secret used when `JWT_SECRET` is not set. Refused in production.
pub const DEV_JWT_SECRET: &str = "workforce-dev-secret-change-this";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub leave: LeaveConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Shared password accepted for profiles that have no credential row
    /// (accounts seeded before credentials were stored).
    pub demo_password: Option<String>,
}

/// Yearly leave entitlements, in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveConfig {
    pub vacation_days: i32,
    pub sick_days: i32,
    pub personal_days: i32,
    pub comp_time_days: i32,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            vacation_days: 25,
            sick_days: 5,
            personal_days: 3,
            comp_time_days: 8,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, then individual variables
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_string("DATABASE_URL") {
            self.database.url = Some(url);
        }
        env_parse("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        env_parse("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);

        env_parse("PORT", &mut self.api.port);
        env_parse("WORKFORCE_API_PORT", &mut self.api.port);
        env_parse("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging);

        env_parse("SECURITY_ENABLE_CORS", &mut self.security.enable_cors);
        if let Some(origins) = env_string("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(secret) = env_string("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        env_parse("SECURITY_JWT_EXPIRY_HOURS", &mut self.security.jwt_expiry_hours);
        if let Ok(v) = env::var("AUTH_DEMO_PASSWORD") {
            self.security.demo_password = Some(v).filter(|p| !p.is_empty());
        }

        env_parse("LEAVE_ENTITLEMENT_VACATION", &mut self.leave.vacation_days);
        env_parse("LEAVE_ENTITLEMENT_SICK", &mut self.leave.sick_days);
        env_parse("LEAVE_ENTITLEMENT_PERSONAL", &mut self.leave.personal_days);
        env_parse("LEAVE_ENTITLEMENT_COMP_TIME", &mut self.leave.comp_time_days);

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
                demo_password: Some("demo123".to_string()),
            },
            leave: LeaveConfig::default(),
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config.security.demo_password = None;
        config
    }

    /// Production has no usable secret or database by default; `validate`
    /// refuses to start until both are supplied.
    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.api.enable_request_logging = false;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config.security.demo_password = None;
        config
    }

    /// Startup checks that should stop the process rather than run misconfigured.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.jwt_secret.is_empty() {
            return Err("JWT secret is empty".to_string());
        }
        if self.environment == Environment::Production {
            if self.security.jwt_secret == DEV_JWT_SECRET {
                return Err("JWT_SECRET must be set in production".to_string());
            }
            if self.database.url.is_none() {
                return Err("DATABASE_URL must be set in production".to_string());
            }
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Overwrites `slot` when `key` is set and parses; otherwise leaves it alone.
fn env_parse<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(parsed) = env_string(key).and_then(|v| v.parse().ok()) {
        *slot = parsed;
    }
}

// Global config - read once at startup, then handed to AppState
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_allow_demo_login() {
        let config = AppConfig::development();
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert_eq!(config.security.demo_password.as_deref(), Some("demo123"));
        assert!(config.database.url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_requires_secret_and_database() {
        let mut config = AppConfig::production();
        assert!(config.security.demo_password.is_none());
        assert!(config.validate().is_err());

        config.security.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_err());

        config.database.url = Some("postgres://localhost/workforce".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_leave_entitlements() {
        let leave = LeaveConfig::default();
        assert_eq!(
            (leave.vacation_days, leave.sick_days, leave.personal_days, leave.comp_time_days),
            (25, 5, 3, 8)
        );
    }
}
