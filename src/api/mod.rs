//! API module for all HTTP handlers

pub mod health;
pub mod webhook;

// Re-export handlers
pub use health::health_check;
pub use webhook::handle_webhook;
