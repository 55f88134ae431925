use thiserror::Error;

/// Top-level error type for the Streakboard service.
#[derive(Debug, Error)]
pub enum StreakError {
    #[error("configuration missing: {0}")]
    Config(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("image conversion failed: {0}")]
    Conversion(String),

    #[error("vision extraction failed: {0}")]
    Vision(String),

    #[error("sheets error: {0}")]
    Ledger(String),

    #[error("telegram API error: {0}")]
    Telegram(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StreakError {
    /// Whether the error is the caller's fault (bad upload) rather than ours
    /// or an upstream service's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StreakError::InvalidImage(_))
    }
}
