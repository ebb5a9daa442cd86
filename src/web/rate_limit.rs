// Per-user rate limiting for the authenticated API, built on tower_governor.
//
// `rate_limit_requests` is the burst a user may spend at once; one request is
// replenished every `rate_limit_window_secs / rate_limit_requests`. Keys come
// from the AuthUser extension, so the governor layer must sit inside
// `require_auth`. Rejections are rewritten into the API's JSON error shape.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{self, header, Extensions, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_governor::key_extractor::KeyExtractor;
use tower_governor::GovernorError;
use tracing::warn;

use super::{api_error, AppState, AuthUser};

/// Key shared by requests that reach the limiter without a user.
const ANONYMOUS_KEY: &str = "anonymous";

/// How often the keyed limiter state is pruned of idle users.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Rate-limits by authenticated user id.
#[derive(Clone)]
pub struct UserKeyExtractor;

impl KeyExtractor for UserKeyExtractor {
    type Key = String;

    fn extract<T>(&self, req: &http::Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(user_key(req.extensions()))
    }
}

fn user_key(extensions: &Extensions) -> String {
    extensions
        .get::<AuthUser>()
        .map(|u| u.user_id.clone())
        .unwrap_or_else(|| ANONYMOUS_KEY.to_string())
}

/// Time to replenish one request: the window spread over the allowance.
pub fn replenish_period(requests: u32, window_secs: u64) -> Duration {
    Duration::from_secs(window_secs.max(1)) / requests.max(1)
}

/// Seconds a rejected caller should wait, from the governor's `Retry-After`
/// header when present, else one replenish period. Never less than 1.
fn retry_after_secs(headers: &HeaderMap, fallback: Duration) -> u64 {
    let from_header = headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let fallback = fallback.as_secs() + u64::from(fallback.subsec_nanos() > 0);
    from_header.unwrap_or(fallback).max(1)
}

/// Axum middleware wrapped around the governor layer: turns its bare 429 into
/// `{"error": "Rate limit exceeded"}` with a `Retry-After` header.
pub async fn reject_as_json(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let user = user_key(request.extensions());
    let response = next.run(request).await;
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let period = replenish_period(
        state.config.rate_limit_requests,
        state.config.rate_limit_window_secs,
    );
    let secs = retry_after_secs(response.headers(), period);
    warn!(user = %user, retry_after_secs = secs, "Rate limit exceeded");

    let mut rejection = api_error(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded");
    rejection
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    rejection
}
