//! Server composition root: config, store, provider, aggregator, router.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, state::AppState};
use crate::catalog::{Aggregator, CatalogStore, UpstreamHealth};
use crate::config::Config;
use crate::observability::Metrics;
use crate::tmdb::{CatalogProvider, TmdbClient};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: SocketAddr) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    // The store is best-effort: a failed open degrades listings to the
    // seed catalog instead of refusing to start.
    let store = match CatalogStore::open(&config.server.store_path) {
        Ok(store) => Some(store),
        Err(error) => {
            warn!(
                path = %config.server.store_path.display(),
                error = %error,
                "Catalog store unavailable, listings will fall back to the seed catalog"
            );
            None
        }
    };

    // Without an API key the upstream path is permanently ineligible
    let provider: Option<Arc<dyn CatalogProvider>> = match config.tmdb.api_key.clone() {
        Some(api_key) => {
            info!(base_url = %config.tmdb.base_url, "Upstream catalog provider enabled");
            Some(Arc::new(TmdbClient::new(&config.tmdb, api_key)?))
        }
        None => {
            warn!("No TMDB API key configured, serving from store/seed only");
            None
        }
    };

    let health = Arc::new(UpstreamHealth::new(Duration::from_millis(
        config.tmdb.cooldown_ms,
    )));
    let metrics = Arc::new(Metrics::new());

    let aggregator = Aggregator::new(
        provider,
        store,
        health,
        Arc::clone(&metrics),
        config.catalog.clone(),
        config.tmdb.per_category,
    );

    let state = AppState::new(config, aggregator, metrics);
    let app = api::router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "ReelBox API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
