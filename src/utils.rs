use tracing::{error, warn};

// For signature verification
use hex::decode as hex_decode;
use hmac::{Hmac, Mac};
use sha2::Sha256;
type HmacSha256 = Hmac<Sha256>;

/// Verifies a GitHub webhook signature against the configured secret.
///
/// An empty secret disables verification entirely and every request is
/// accepted. This keeps local setups working without a secret, at the cost
/// of accepting unauthenticated traffic, so each acceptance is logged as a
/// warning.
pub fn verify_github_signature(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    if secret.is_empty() {
        warn!("No webhook secret configured, skipping signature verification");
        return true;
    }

    if signature_header.is_empty() {
        error!("No signature provided in webhook request");
        return false;
    }

    // Expected format: "sha256=<hex>", but a bare hex digest is accepted too.
    let hex_digest = signature_header
        .strip_prefix("sha256=")
        .unwrap_or(signature_header);

    let provided = match hex_decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            error!("Signature header is not valid hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    // verify_slice is constant-time
    mac.verify_slice(&provided).is_ok()
}

/// Escapes special characters for Telegram MarkdownV2.
///
/// Total over arbitrary input; characters outside the escape class pass
/// through unchanged.
pub fn escape_markdown(text: &str) -> String {
    const ESCAPE_CHARS: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];

    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ESCAPE_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes text for a MarkdownV2 inline code span, where only backslash
/// and backtick are special.
pub fn escape_code(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\\' || ch == '`' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes a URL for a MarkdownV2 link target, where only backslash and
/// the closing parenthesis are special.
pub fn escape_link_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for ch in url.chars() {
        if ch == '\\' || ch == ')' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Truncates text to `max_length` characters with a trailing ellipsis.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// First 7 characters of a commit SHA; shorter input is returned as-is.
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(7).collect()
}
