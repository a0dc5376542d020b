use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use skillswap_core::{AppResult, Clock, NonEmptyString};

use crate::ExpiredEntrySweeper;

use super::config::{RateLimitDecision, RateLimitRule};
use super::ports::RateLimitRepository;

/// Application service for rate limiting.
#[derive(Clone)]
pub struct RateLimitService {
    repository: Arc<dyn RateLimitRepository>,
    clock: Arc<dyn Clock>,
}

impl RateLimitService {
    /// Creates a new rate limit service.
    #[must_use]
    pub fn new(repository: Arc<dyn RateLimitRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Counts one request for `identifier` under `rule` and reports whether it
    /// fits in the current window.
    ///
    /// Every call counts, including denied ones. Denial is reported through
    /// [`RateLimitDecision::allowed`]; errors are reserved for a blank
    /// identifier or a failing backend.
    pub async fn check(
        &self,
        rule: &RateLimitRule,
        identifier: &str,
    ) -> AppResult<RateLimitDecision> {
        let identifier = NonEmptyString::new(identifier)?;
        let key = rule.key_for(identifier.as_str());
        let info = self
            .repository
            .record_attempt(&key, rule.window(), self.clock.now())
            .await?;

        Ok(RateLimitDecision::evaluate(
            rule,
            info.attempt_count,
            info.window_ends_at,
        ))
    }

    /// Removes expired counters. Intended for periodic cleanup.
    pub async fn cleanup(&self) -> AppResult<u64> {
        self.repository.cleanup_expired(self.clock.now()).await
    }

    /// Current instant according to the service clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Label of the configured counter backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }
}

#[async_trait]
impl ExpiredEntrySweeper for RateLimitService {
    fn sweeper_name(&self) -> &'static str {
        "rate_limit"
    }

    async fn sweep_expired(&self) -> AppResult<u64> {
        self.cleanup().await
    }
}
