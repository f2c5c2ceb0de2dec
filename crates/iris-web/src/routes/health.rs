//! Liveness route handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Provider ids that currently hold an API key
    pub providers: Vec<&'static str>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: iris_core::VERSION,
        providers: state
            .analyzer
            .configured_providers()
            .into_iter()
            .map(|p| p.id())
            .collect(),
    })
}
