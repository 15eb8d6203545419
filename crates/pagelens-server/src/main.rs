//! Pagelens API server.
//!
//! Serves the health endpoint and the SSE results endpoint over axum,
//! wiring the analysis engine to the real HTTP fetcher and a TTL
//! response cache.

mod cache;
mod routes;
mod state;

use anyhow::{Context, Result};
use pagelens_analyzer::PageAnalyzer;
use pagelens_core::AppConfig;
use pagelens_fetch::HttpFetcher;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::ResponseCache;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pagelens_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load_with_env().context("failed to load configuration")?;
    let workers = config.scanning.worker_count();
    tracing::info!(workers, "configuration loaded");

    let fetcher = Arc::new(
        HttpFetcher::new(config.scanning.timeout(), &config.scanning.user_agent)
            .context("failed to build HTTP client")?,
    );
    let analyzer = Arc::new(PageAnalyzer::new(fetcher, workers));
    let cache = Arc::new(ResponseCache::new(config.cache.ttl()));
    cache.clone().spawn_sweeper(config.cache.sweep_interval());

    let app = routes::router(AppState { analyzer, cache })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server port")?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
