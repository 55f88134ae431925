//! Main HTTP Gateway Server.
//!
//! Routes: upload form, multipart upload, Telegram webhook, default-image
//! processing, health.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use ledger::SheetsLedger;
use streakboard_channels::TelegramClient;
use streakboard_config::Config;
use streakboard_understanding::{OcrClient, VisionClient};

use crate::{pages, upload, webhook};

/// Max accepted upload body: 16 MiB.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across routes: configuration plus the injected
/// outbound clients. Integrations whose configuration is absent stay `None`
/// and report a configuration error when a request needs them.
pub struct AppState {
    pub config: Config,
    pub vision: Option<VisionClient>,
    pub ocr: OcrClient,
    pub ledger: Option<SheetsLedger>,
    pub telegram: Option<TelegramClient>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/upload", post(upload::upload_file))
        .route("/telegram/webhook", post(webhook::telegram_webhook))
        .route("/process-default", get(upload::process_default))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "streakboard",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
