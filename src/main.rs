// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use phi_ratio_analyzer::{
    api::{start_server, AppState},
    config::ServerConfig,
    version,
    vision::VisionModelManager,
};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();

    info!("📦 {}", version::get_version_string());

    // Models are required; a missing file ends the process here
    info!("🧠 Loading landmark models...");
    let manager = VisionModelManager::load(&config.models.to_model_config())
        .context("Landmark models must be available at startup")?;
    for model in manager.list_models() {
        info!(
            "   {} ({}) from {}",
            model.name,
            model.model_type,
            model.path.display()
        );
    }

    let state = AppState::new(manager.provider());
    start_server(config.socket_addr(), state, &config.cors_origins).await
}
