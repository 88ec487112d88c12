pub mod api;
pub mod error;
pub mod event;
pub mod format;
pub mod logging;
pub mod notify;
pub mod utils;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use crate::notify::Notifier;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";

/// Runtime configuration, loaded once at startup from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub webhook_secret: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_admin_chat_id: Option<String>,
    pub log_dir: Option<String>,
}

impl Config {
    /// Build the configuration from environment variables.
    /// Empty values are treated the same as unset values.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            webhook_secret: env_nonempty("GITHUB_WEBHOOK_SECRET"),
            telegram_token: env_nonempty("TELEGRAM_BOT_TOKEN"),
            telegram_admin_chat_id: env_nonempty("TELEGRAM_ADMIN_CHAT_ID"),
            log_dir: env_nonempty("LOG_DIR"),
        }
    }

    /// Returns true if webhook signature validation is enforced.
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret.is_some()
    }

    /// The configured webhook secret, or "" when verification is disabled.
    pub fn webhook_secret(&self) -> &str {
        self.webhook_secret.as_deref().unwrap_or("")
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

pub struct AppState {
    pub config: Config,
    pub notifier: Arc<dyn Notifier>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;
