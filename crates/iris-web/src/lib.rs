//! Iris Web Server
//!
//! Axum-based upload front: an embedded form plus JSON analysis endpoints.

pub mod error;
pub mod routes;
pub mod state;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use iris_core::{Analyzer, Config, Validator};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Room for multipart boundaries and the text fields on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.validator.max_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(routes::index::index))
        .route("/health", get(routes::health::health))
        .route("/analyze", post(routes::analyze::analyze))
        .route("/compare", post(routes::analyze::compare))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server until Ctrl-C.
pub async fn run_server(config: &Config, analyzer: Arc<Analyzer>) -> anyhow::Result<()> {
    let upload_dir = config.upload_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;

    let state = AppState::new(analyzer, Validator::new(&config.limits), upload_dir);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
