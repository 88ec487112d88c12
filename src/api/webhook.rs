//! Webhook handler for GitHub events

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
};
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::SharedState;
use crate::event::classify;
use crate::format::format_event;
use crate::utils::verify_github_signature;

/// Handles the GitHub webhook POST request.
///
/// Verify signature, parse JSON, classify, format, then hand the message
/// off to the notifier on a background task so a slow delivery never
/// delays the webhook response.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let event_type = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_github_signature(state.config.webhook_secret(), &body, signature) {
        error!("Invalid webhook signature");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Invalid signature"})),
        );
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            error!("Invalid JSON payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid JSON"})),
            );
        }
    };

    let event = classify(event_type, &payload);
    match format_event(&event) {
        Some(message) => {
            info!("Dispatching {} notification", event_type);
            let notifier = state.notifier.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.send(&message).await {
                    error!(
                        "Failed to deliver notification via {}: {}",
                        notifier.name(),
                        e
                    );
                }
            });
        }
        None => debug!("No notification for {:?} event", event_type),
    }

    (StatusCode::OK, Json(json!({"status": "success"})))
}
