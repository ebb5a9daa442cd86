// Auth middleware: stateless HMAC-SHA256 bearer tokens.
//
// Token format: {subject_b64}.{timestamp_secs}.{nonce_hex}.{hmac_hex}
//
// The subject is the user id, URL-safe base64 without padding so it never
// contains a '.'. The HMAC covers "{subject_b64}.{timestamp_secs}.{nonce_hex}"
// signed with MEDIAKIT_SESSION_SECRET. Tokens are valid for TOKEN_TTL_SECS.
//
// Tokens are minted out of band with `mediakit token --user <id>`. There is
// no token table in the database.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use tracing::debug;

use super::{api_error, AppState, AuthUser};

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECS: u64 = 86_400;

/// Build a new bearer token for `subject` signed with `secret`.
pub fn create_token(secret: &str, subject: &str) -> String {
    create_token_at(secret, subject, now_secs())
}

fn create_token_at(secret: &str, subject: &str, timestamp: u64) -> String {
    let mut nonce_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = hex::encode(nonce_bytes);

    let subject_b64 = URL_SAFE_NO_PAD.encode(subject.as_bytes());
    let payload = format!("{subject_b64}.{timestamp}.{nonce}");
    let sig = hmac_sign(secret, &payload);

    format!("{payload}.{sig}")
}

/// Verify a bearer token. Returns the subject if the HMAC is valid and the
/// token is not older than `TOKEN_TTL_SECS`.
pub fn verify_token(secret: &str, token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split('.').collect();
    let [subject_b64, timestamp_str, nonce, provided_sig] = parts.as_slice() else {
        return None;
    };

    let payload = format!("{subject_b64}.{timestamp_str}.{nonce}");
    let expected_sig = hmac_sign(secret, &payload);
    if !constant_time_eq(provided_sig, &expected_sig) {
        return None;
    }

    let timestamp = timestamp_str.parse::<u64>().ok()?;
    if now_secs().saturating_sub(timestamp) >= TOKEN_TTL_SECS {
        return None;
    }

    let subject = URL_SAFE_NO_PAD.decode(subject_b64).ok()?;
    let subject = String::from_utf8(subject).ok()?;
    if subject.is_empty() {
        return None;
    }
    Some(subject)
}

/// Axum middleware: reject requests without a valid bearer token with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = bearer_subject(&request, &state.config.session_secret) else {
        return api_error(StatusCode::UNAUTHORIZED, "Authentication required");
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}

/// Axum middleware for routes that serve anonymous callers too: attaches
/// `AuthUser` when a valid token is present and never rejects.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user_id) = bearer_subject(&request, &state.config.session_secret) {
        request.extensions_mut().insert(AuthUser { user_id });
    }
    next.run(request).await
}

// --- Private helpers ---

fn bearer_subject(request: &Request, secret: &str) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    let subject = verify_token(secret, token.trim());
    if subject.is_none() {
        debug!("Rejected bearer token");
    }
    subject
}

fn hmac_sign(secret: &str, payload: &str) -> String {
    // HMAC accepts keys of any length, so this never fails in practice
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
