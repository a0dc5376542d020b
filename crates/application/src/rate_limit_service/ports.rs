use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use skillswap_core::AppResult;

/// Repository port for fixed-window request counters.
#[async_trait]
pub trait RateLimitRepository: Send + Sync {
    /// Records one request for the given key.
    ///
    /// Rolls the window over first when it ended at or before `now`. Returns
    /// the updated count within the active window. Increments for the same
    /// key must never be lost under concurrent callers.
    async fn record_attempt(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo>;

    /// Removes counters whose window ended at or before `now`.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Short backend label used in logs and health output.
    fn backend_name(&self) -> &'static str;
}

/// Information about the current rate limit window for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptInfo {
    /// Number of requests in the current window (including this one).
    pub attempt_count: u32,
    /// When the current window ends.
    pub window_ends_at: DateTime<Utc>,
}
