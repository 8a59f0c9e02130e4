pub mod handlers;
pub mod render;

use crate::app::dashboard::Dashboard;
use crate::config::DashboardConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::validate_socket_addr;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use render::PageRenderer;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Read-only state shared by every request.
pub struct AppState {
    pub dashboard: Dashboard<DashboardConfig>,
    pub renderer: PageRenderer,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        Ok(Self {
            dashboard: Dashboard::new(config)?,
            renderer: PageRenderer::new()?,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let max_upload = state.dashboard.config().max_upload_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: DashboardConfig) -> Result<()> {
    let addr = validate_socket_addr("bind_address", &config.bind_address)?;
    let state = Arc::new(AppState::new(config)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
