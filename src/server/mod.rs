//! Host server: serves the built SPA, its runtime config, and forwards `/api`.

mod proxy;

pub use proxy::{proxy_handler, ProxyError};

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, ClientConfig, ServerConfig};

/// Largest request body forwarded to the backend (image uploads)
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub client_config: ClientConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("riad-booking/", env!("RIAD_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client_config: config.client_config(),
            config: Arc::new(config),
            http,
        })
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
}

/// GET /healthz
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("RIAD_VERSION"),
        git_sha: env!("RIAD_GIT_SHA"),
    })
}

/// GET /app-config.json - runtime settings for the browser app
pub async fn app_config_handler(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.client_config.clone())
}

/// Build the full router. Unknown paths fall back to `index.html` so client-side
/// routes survive a reload.
pub fn router(state: AppState) -> Router {
    let dist: &Path = &state.config.dist_dir;
    let spa = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/app-config.json", get(app_config_handler))
        .route("/api", any(proxy_handler))
        .route("/api/{*path}", any(proxy_handler))
        .fallback_service(spa)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Entry point for the `riad-booking` binary.
pub async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riad_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Riad Booking v{}", env!("RIAD_VERSION"));

    let config = config::load_config()?;
    tracing::info!(
        "Configuration loaded, port: {}, api: {}, dist: {:?}",
        config.port,
        config.api_base_url,
        config.dist_dir
    );
    if !config.dist_dir.join("index.html").exists() {
        tracing::warn!(
            "No index.html in {:?}; run `dx build --platform web` first",
            config.dist_dir
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config)?);

    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
