//! Periodic maintenance ports.

use async_trait::async_trait;

use skillswap_core::AppResult;

/// A store whose expired entries are removed on a fixed interval.
#[async_trait]
pub trait ExpiredEntrySweeper: Send + Sync {
    /// Stable name used in logs.
    fn sweeper_name(&self) -> &'static str;

    /// Removes expired entries and returns how many were deleted.
    async fn sweep_expired(&self) -> AppResult<u64>;
}
