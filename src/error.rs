/// Custom error type for github_telegram_notify operations
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Telegram API returned status {status}: {body}")]
    TelegramApi { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Helper type for Results that use BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
