use axum::Json;
use axum::extract::{Extension, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use skillswap_application::{RateLimitDecision, RateLimitRule};
use tracing::warn;

use crate::dto::ErrorResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub const UNKNOWN_CLIENT: &str = "unknown";

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
const DEFAULT_DENIAL_MESSAGE: &str = "too many requests, try again later";

/// Counts the request against the route group's rule and rejects it with 429
/// once the window is exhausted.
pub async fn rate_limit(
    State(state): State<AppState>,
    Extension(rule): Extension<RateLimitRule>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let client = client_identifier(request.headers());
    let decision = state.rate_limit_service.check(&rule, &client).await?;

    if !decision.allowed {
        warn!(
            category = rule.category(),
            client = %client,
            limit = decision.limit,
            "rate limit exceeded"
        );
        return Ok(rate_limited_response(
            &decision,
            state.rate_limit_service.now(),
        ));
    }

    let mut response = next.run(request).await;
    apply_rate_limit_headers(response.headers_mut(), &decision);
    Ok(response)
}

/// Best-effort client address: first `x-forwarded-for` entry, then
/// `x-real-ip`, then [`UNKNOWN_CLIENT`].
///
/// The headers are taken at face value. Only deploy behind a reverse proxy
/// that strips or overwrites both, otherwise clients can rotate them to get
/// new rate-limit and lockout buckets.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_owned()
}

/// 429 response with an `{"error": ...}` body and a `Retry-After` header.
pub fn retry_after_response(message: &str, retry_after_seconds: u64) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorResponse::new(message)),
    )
        .into_response();
    response.headers_mut().insert(
        header::RETRY_AFTER,
        HeaderValue::from(retry_after_seconds),
    );
    response
}

fn rate_limited_response(decision: &RateLimitDecision, now: DateTime<Utc>) -> Response {
    let message = decision.message.as_deref().unwrap_or(DEFAULT_DENIAL_MESSAGE);
    let mut response = retry_after_response(message, decision.retry_after_seconds(now));
    apply_rate_limit_headers(response.headers_mut(), decision);
    response
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        RATE_LIMIT_RESET,
        HeaderValue::from(decision.reset_at.timestamp_millis()),
    );
}
