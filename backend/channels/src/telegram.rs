/// Telegram channel adapter for Streakboard.
///
/// Webhook-driven: Telegram POSTs updates to the gateway, which parses them
/// with the wire types below. Outbound work goes through the Bot API:
///  - `getFile` + binary fetch (two-step download of an inbound photo)
///  - `sendMessage` (reply to the originating chat)
///
/// Required env var:
///   TELEGRAM_BOT_TOKEN — BotFather token (123456:ABC-...)
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use streakboard_core::StreakError;

// ---------------------------------------------------------------------------
// Telegram wire types (minimal subset)
// ---------------------------------------------------------------------------

/// Top-level update envelope delivered to the webhook.
#[derive(Deserialize, Debug)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
    /// Edits arrive separately; we treat them like fresh messages.
    pub edited_message: Option<TelegramMessage>,
}

impl TelegramUpdate {
    /// The message carried by this update, if any.
    pub fn message(&self) -> Option<&TelegramMessage> {
        self.message.as_ref().or(self.edited_message.as_ref())
    }
}

#[derive(Deserialize, Debug)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    /// Present on photo messages: the same photo in several resolutions.
    pub photo: Option<Vec<PhotoSize>>,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

/// Pick the highest-resolution variant of a photo.
pub fn best_photo(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Bot API client
// ---------------------------------------------------------------------------

pub struct TelegramClient {
    token: String,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("https://api.telegram.org/file/bot{}/{}", self.token, file_path)
    }

    /// Download a file by `file_id` into `upload_dir` and return its path.
    ///
    /// Two steps: `getFile` resolves the id to a server-side path, then the
    /// file endpoint serves the bytes. Saved as
    /// `telegram_<unix-ts>.<ext>`; same-second downloads share a name, an
    /// accepted race at this scale.
    pub async fn download_file(
        &self,
        file_id: &str,
        upload_dir: &Path,
    ) -> Result<PathBuf, StreakError> {
        let resp = self
            .http
            .get(self.api_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| StreakError::Telegram(e.to_string()))?;
        let body: ApiResponse<FileInfo> = resp
            .json()
            .await
            .map_err(|e| StreakError::Telegram(e.to_string()))?;

        if !body.ok {
            return Err(StreakError::Telegram(format!(
                "getFile failed: {}",
                body.description.unwrap_or_else(|| "no description".into())
            )));
        }
        let file_path = body
            .result
            .and_then(|f| f.file_path)
            .ok_or_else(|| StreakError::Telegram("getFile returned no file_path".into()))?;

        let resp = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| StreakError::Telegram(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(StreakError::Telegram(format!(
                "file download returned {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| StreakError::Telegram(e.to_string()))?;

        let filename = format!(
            "telegram_{}{}",
            chrono::Utc::now().timestamp(),
            extension_of(&file_path)
        );
        let dest = upload_dir.join(filename);
        tokio::fs::write(&dest, &bytes).await?;

        info!("[Telegram] Downloaded {} -> {}", file_id, dest.display());
        Ok(dest)
    }

    /// Send a plain-text reply to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), StreakError> {
        let payload = serde_json::json!({ "chat_id": chat_id, "text": text });
        let resp = self
            .http
            .post(self.api_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| StreakError::Telegram(e.to_string()))?;

        if !resp.status().is_success() {
            let err = resp.text().await.unwrap_or_default();
            error!("[Telegram] sendMessage to {} failed: {}", chat_id, err);
            return Err(StreakError::Telegram(format!("sendMessage failed: {err}")));
        }
        info!("[Telegram] Sent message to chat {}", chat_id);
        Ok(())
    }
}

/// Extension of the server-side file path, defaulting to `.jpg`.
fn extension_of(file_path: &str) -> String {
    Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| ".jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(file_id: &str, width: u32, height: u32) -> PhotoSize {
        PhotoSize {
            file_id: file_id.to_string(),
            width,
            height,
            file_size: None,
        }
    }

    #[test]
    fn best_photo_picks_highest_resolution() {
        let sizes = [
            size("thumb", 90, 67),
            size("large", 1280, 960),
            size("medium", 320, 240),
        ];
        assert_eq!(best_photo(&sizes).unwrap().file_id, "large");
    }

    #[test]
    fn best_photo_of_empty_slice_is_none() {
        assert!(best_photo(&[]).is_none());
    }

    #[test]
    fn parses_photo_update() {
        let raw = r#"{
            "update_id": 7,
            "message": {
                "message_id": 1,
                "chat": {"id": 42, "type": "private"},
                "photo": [
                    {"file_id": "a", "file_unique_id": "ua", "width": 90, "height": 67},
                    {"file_id": "b", "file_unique_id": "ub", "width": 1280, "height": 960}
                ]
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(raw).unwrap();
        let message = update.message().unwrap();
        assert_eq!(message.chat.id, 42);
        let photos = message.photo.as_deref().unwrap();
        assert_eq!(best_photo(photos).unwrap().file_id, "b");
    }

    #[test]
    fn edited_message_counts_as_a_message() {
        let raw = r#"{
            "edited_message": {
                "message_id": 2,
                "chat": {"id": 9, "type": "private"},
                "text": "hello"
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.message().unwrap().text.as_deref(), Some("hello"));
    }

    #[test]
    fn extension_falls_back_to_jpg() {
        assert_eq!(extension_of("photos/file_7.png"), ".png");
        assert_eq!(extension_of("photos/file_7"), ".jpg");
    }
}
