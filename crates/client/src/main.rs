use std::sync::Arc;

use anyhow::Context;
use client::app::ChessApp;
use client::{ApiClient, ClientConfig, Dispatcher};
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let api = Arc::new(ApiClient::new(&config).context("Failed to build HTTP client")?);
    match runtime.block_on(api.health()) {
        Ok(_) => tracing::info!("Connected to {}", api.base_url()),
        Err(e) => tracing::warn!("Server at {} is not reachable yet: {}", api.base_url(), e),
    }

    let dispatcher = Dispatcher::new(api, runtime.handle().clone());
    let app = ChessApp::new(dispatcher);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MiniGPTChess")
            .with_inner_size([660.0, 730.0])
            .with_resizable(false),
        ..Default::default()
    };

    tracing::info!("Client started");
    eframe::run_native("MiniGPTChess", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("GUI error: {e}"))?;
    Ok(())
}
