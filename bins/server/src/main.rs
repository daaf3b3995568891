//! Polifund API Server
//!
//! Main entry point for the Polifund ledger backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polifund_api::{AppState, create_router};
use polifund_db::connect;
use polifund_shared::{AppConfig, HubClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polifund=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create Hub client
    let hub = HubClient::new(config.hub.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build Hub client: {e}"))?;
    info!(hub_url = %config.hub.base_url, "Hub client configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        hub: Arc::new(hub),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
