use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::auth::JwtKeys;
use crate::{app, config, store_from_config, AppState};

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to bind (overrides WORKFORCE_API_PORT/PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config::config();
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Starting Workforce API in {:?} mode", config.environment);
    if crate::is_development!() && config.security.jwt_secret == config::DEV_JWT_SECRET {
        tracing::warn!("Signing tokens with the development JWT secret");
    }

    let store = store_from_config(&config.database).await?;
    let jwt = JwtKeys::from_config(&config.security)?;
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        jwt,
    };

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Workforce API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
