//! scrapi server entry point.
//!
//! Boots the HTTP gateway: loads configuration and scrap definitions,
//! builds the shared application state, and serves the endpoint table
//! over axum.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use scrapi_core::AppConfig;
use scrapi_core::definitions::Definitions;
use scrapi_server::{app, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let definitions = Definitions::load(config.definitions_file.as_deref())?;
    tracing::info!(services = definitions.len(), "Loaded scrap definitions");

    let state = AppState::new(config.clone(), definitions)?;
    let app = app::build(state);

    tracing::info!(addr = %config.bind_addr, "Starting scrapi server");
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
