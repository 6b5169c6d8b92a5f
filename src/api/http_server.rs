// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::analyze::{analyze_phi_ratio_handler, request::MAX_ENCODED_IMAGE_SIZE};
use super::realtime::realtime_face_handler;
use crate::vision::provider::LandmarkProvider;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LandmarkProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LandmarkProvider>) -> Self {
        Self { provider }
    }
}

/// Build the CORS layer for an origin allow-list
///
/// `*` anywhere in the list allows every origin; credentials are then
/// disabled since browsers reject that combination.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o.trim() == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // GET routes also answer HEAD
        .route("/health", get(health_handler))
        // Room for the largest accepted image plus the JSON envelope
        .route(
            "/analyze-phi-ratio",
            post(analyze_phi_ratio_handler)
                .layer(DefaultBodyLimit::max(MAX_ENCODED_IMAGE_SIZE + 1024)),
        )
        .route("/ws/realtime-face", get(realtime_face_handler))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
    cors_origins: &[String],
) -> anyhow::Result<()> {
    let app = create_router(state, cors_origins);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🚀 Phi ratio analyzer listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "Server is healthy" })))
}
