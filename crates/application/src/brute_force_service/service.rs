use std::sync::Arc;

use async_trait::async_trait;

use skillswap_core::{AppResult, Clock, NonEmptyString};
use skillswap_domain::AttemptStatus;

use crate::ExpiredEntrySweeper;

use super::config::BruteForcePolicy;
use super::ports::AttemptRepository;

/// Application service tracking failed authentication attempts.
///
/// Callers check before verifying credentials, record a failure only after
/// the credentials were confirmed wrong, and reset on success.
#[derive(Clone)]
pub struct BruteForceService {
    repository: Arc<dyn AttemptRepository>,
    clock: Arc<dyn Clock>,
}

impl BruteForceService {
    /// Creates a new brute force service.
    #[must_use]
    pub fn new(repository: Arc<dyn AttemptRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Reports whether `identifier` may attempt authentication now.
    ///
    /// Does not count an attempt.
    pub async fn check_status(
        &self,
        identifier: &str,
        policy: &BruteForcePolicy,
    ) -> AppResult<AttemptStatus> {
        let identifier = NonEmptyString::new(identifier)?;
        let now = self.clock.now();
        let record = self
            .repository
            .current(identifier.as_str(), policy, now)
            .await?;

        Ok(record.status(now, policy.max_attempts()))
    }

    /// Counts one failed attempt, locking the identifier once the policy's
    /// threshold is reached. Returns the status after the failure.
    pub async fn record_failure(
        &self,
        identifier: &str,
        policy: &BruteForcePolicy,
    ) -> AppResult<AttemptStatus> {
        let identifier = NonEmptyString::new(identifier)?;
        let now = self.clock.now();
        let record = self
            .repository
            .record_failure(identifier.as_str(), policy, now)
            .await?;

        Ok(record.status(now, policy.max_attempts()))
    }

    /// Forgets every failure recorded for `identifier`.
    pub async fn reset(&self, identifier: &str) -> AppResult<()> {
        self.repository.clear(identifier).await
    }

    /// Removes stale records. Intended for periodic cleanup.
    pub async fn cleanup(&self) -> AppResult<u64> {
        self.repository.cleanup_expired(self.clock.now()).await
    }
}

#[async_trait]
impl ExpiredEntrySweeper for BruteForceService {
    fn sweeper_name(&self) -> &'static str {
        "brute_force"
    }

    async fn sweep_expired(&self) -> AppResult<u64> {
        self.cleanup().await
    }
}
