use async_trait::async_trait;
use chrono::{DateTime, Utc};

use skillswap_core::AppResult;
use skillswap_domain::AttemptRecord;

use super::config::BruteForcePolicy;

/// Repository port for failed-attempt records.
///
/// Implementations apply each operation atomically per key.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Returns the record for `key` normalized at `now`, creating a fresh one
    /// when none exists or the stored one is stale. Never counts an attempt.
    async fn current(
        &self,
        key: &str,
        policy: &BruteForcePolicy,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptRecord>;

    /// Normalizes the record at `now`, counts one failure and returns the
    /// updated record.
    async fn record_failure(
        &self,
        key: &str,
        policy: &BruteForcePolicy,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptRecord>;

    /// Deletes the record for `key`.
    async fn clear(&self, key: &str) -> AppResult<()>;

    /// Deletes records that are stale and not locked at `now`.
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
