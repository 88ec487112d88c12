use axum::{Router, routing};
use chrono::Utc;
use github_telegram_notify::api::{handle_webhook, health_check};
use github_telegram_notify::logging::init_logging;
use github_telegram_notify::notify::{Notifier, TelegramNotifier};
use github_telegram_notify::{AppState, Config};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let _log_guard = init_logging(config.log_dir.as_deref());

    if !config.has_webhook_secret() {
        warn!("GITHUB_WEBHOOK_SECRET is not set; webhook signature verification is disabled");
    }

    let notifier = TelegramNotifier::new(
        config.telegram_token.clone(),
        config.telegram_admin_chat_id.clone(),
    );
    if !notifier.enabled() {
        warn!("Telegram delivery not configured; notifications will only be logged");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(notifier);

    let state = Arc::new(AppState {
        config: config.clone(),
        notifier,
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = Router::new()
        .route("/webhook", routing::post(handle_webhook))
        .route("/health", routing::get(health_check))
        .with_state(state);

    info!("Listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .unwrap();
    axum::serve(listener, app).await.unwrap();
}
