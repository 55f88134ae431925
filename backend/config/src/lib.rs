//! Streakboard runtime configuration.
//!
//! Everything comes from environment variables. Integration values are
//! optional: a missing key means the corresponding client is never
//! constructed, and any request that needs it gets a reported error instead
//! of a crash.

use serde::Deserialize;

/// Streakboard runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Directory incoming images are written to
    pub upload_dir: String,
    /// Image processed by GET /process-default
    pub default_image: String,
    /// Directory for rolling NDJSON log files
    pub log_dir: String,
    /// Log level when RUST_LOG is unset
    pub log_level: String,

    // Vision extraction
    pub vision_endpoint: Option<String>,
    pub vision_api_key: Option<String>,
    pub vision_deployment: String,

    // OCR fallback
    pub ocr_api_key: Option<String>,

    // Spreadsheet ledger
    pub spreadsheet_id: Option<String>,
    /// Per-sheet cell window, prefixed with the platform-selected sheet name
    pub sheet_range: String,
    /// Path to the Google service-account credential JSON
    pub google_credentials: String,

    // Telegram
    pub telegram_bot_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: "uploads".to_string(),
            default_image: "image/with_streaks_cropped.jpg".to_string(),
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
            vision_endpoint: None,
            vision_api_key: None,
            vision_deployment: "gpt-4o".to_string(),
            ocr_api_key: None,
            spreadsheet_id: None,
            sheet_range: "A1:C".to_string(),
            google_credentials: "credentials/cred.json".to_string(),
            telegram_bot_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injected lookup (useful for testing).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Self {
            bind_address: lookup("STREAKBOARD_BIND").unwrap_or(defaults.bind_address),
            // PORT is what hosting platforms (Render et al.) set.
            port: lookup("STREAKBOARD_PORT")
                .or_else(|| lookup("PORT"))
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            upload_dir: lookup("STREAKBOARD_UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            default_image: lookup("STREAKBOARD_DEFAULT_IMAGE").unwrap_or(defaults.default_image),
            log_dir: lookup("STREAKBOARD_LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            vision_endpoint: lookup("VISION_ENDPOINT"),
            vision_api_key: lookup("VISION_API_KEY"),
            vision_deployment: lookup("VISION_DEPLOYMENT").unwrap_or(defaults.vision_deployment),
            ocr_api_key: lookup("OCR_API_KEY"),
            spreadsheet_id: lookup("SPREADSHEET_ID"),
            sheet_range: lookup("SHEET_RANGE_NAME").unwrap_or(defaults.sheet_range),
            google_credentials: lookup("GOOGLE_APPLICATION_CREDENTIALS")
                .unwrap_or(defaults.google_credentials),
            telegram_bot_token: lookup("TELEGRAM_BOT_TOKEN"),
        }
    }
}
