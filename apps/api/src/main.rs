mod analysis;
mod config;
mod errors;
mod models;
mod profile;
mod providers;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::bulk::BulkOptions;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Opportunity Matcher API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize the encrypted profile store
    let store = ProfileStore::new(config.profile_path.clone(), &config.encryption_key)?;
    info!("Profile store initialized at {}", config.profile_path.display());

    // Bulk analysis pacing, fixed for the process lifetime
    let bulk = BulkOptions {
        batch_size: config.batch_size,
        batch_pause: Duration::from_secs(config.batch_pause_secs),
    };
    info!(
        "Bulk analysis configured: batch size {}, pause {:?}",
        bulk.batch_size, bulk.batch_pause
    );

    // Build app state
    let state = AppState { store, bulk };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
