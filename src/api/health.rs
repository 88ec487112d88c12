//! Health check endpoint

use axum::{Json, extract::State as AxumState};
use serde_json::{Value, json};

use crate::SharedState;

/// Returns a fixed status object while the process is alive. No auth.
pub async fn health_check(AxumState(state): AxumState<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "github-webhook-handler",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}
