//! Telegram webhook endpoint.
//!
//! Telegram re-delivers updates until it sees a 200, so every handled path
//! answers 200 with an empty body; errors are acknowledged in-chat instead.
//! Only an unparseable update surfaces a 500.

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{error, warn};

use streakboard_channels::{best_photo, TelegramClient, TelegramUpdate};

use crate::pipeline::process_image;
use crate::server::AppState;

pub async fn telegram_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            error!("[Telegram] Unparseable update: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let Some(message) = update.message() else {
        return StatusCode::OK;
    };
    let chat_id = message.chat.id;

    let Some(telegram) = state.telegram.as_ref() else {
        warn!("[Telegram] Update received but TELEGRAM_BOT_TOKEN is not set");
        return StatusCode::OK;
    };

    let Some(photo) = message.photo.as_deref().and_then(best_photo) else {
        reply_best_effort(telegram, chat_id, "Please send an image to process.").await;
        return StatusCode::OK;
    };

    let filepath = match telegram
        .download_file(&photo.file_id, Path::new(&state.config.upload_dir))
        .await
    {
        Ok(path) => path,
        Err(e) => {
            error!("[Telegram] Download failed: {}", e);
            reply_best_effort(telegram, chat_id, "Failed to download image.").await;
            return StatusCode::OK;
        }
    };

    match process_image(&state, &filepath).await {
        Ok(outcome) => {
            let reply = format!(
                "✅ Processed.\n\nName: {}\nStreak: {}\nSaved: {}",
                outcome.extraction.name, outcome.extraction.streak, outcome.report.sheet
            );
            reply_best_effort(telegram, chat_id, &reply).await;
        }
        Err(e) => {
            error!("[Telegram] Processing failed: {}", e);
            reply_best_effort(telegram, chat_id, &format!("Processing failed: {e}")).await;
        }
    }

    StatusCode::OK
}

async fn reply_best_effort(telegram: &TelegramClient, chat_id: i64, text: &str) {
    if let Err(e) = telegram.send_message(chat_id, text).await {
        error!("[Telegram] Reply to {} failed: {}", chat_id, e);
    }
}
