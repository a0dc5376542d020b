use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skillswap_application::{AttemptRepository, BruteForcePolicy};
use skillswap_core::AppResult;
use skillswap_domain::AttemptRecord;
use tokio::sync::Mutex;

/// Process-local failed-attempt records.
#[derive(Default)]
pub struct InMemoryAttemptRepository {
    records: Mutex<HashMap<String, AttemptRecord>>,
}

impl InMemoryAttemptRepository {
    /// Creates an empty in-memory attempt store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn apply<T>(
        &self,
        key: &str,
        policy: &BruteForcePolicy,
        now: DateTime<Utc>,
        update: impl FnOnce(&mut AttemptRecord) -> T + Send,
    ) -> T {
        let mut records = self.records.lock().await;
        let record = records
            .entry(key.to_owned())
            .or_insert_with(|| AttemptRecord::fresh(now, policy.reset_window()));
        record.normalize(now, policy.reset_window());
        update(record)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn current(
        &self,
        key: &str,
        policy: &BruteForcePolicy,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptRecord> {
        Ok(self.apply(key, policy, now, |record| *record).await)
    }

    async fn record_failure(
        &self,
        key: &str,
        policy: &BruteForcePolicy,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptRecord> {
        Ok(self
            .apply(key, policy, now, |record| {
                record.register_failure(now, policy.max_attempts(), policy.lockout_duration());
                *record
            })
            .await)
    }

    async fn clear(&self, key: &str) -> AppResult<()> {
        self.records.lock().await.remove(key);
        Ok(())
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| !record.is_stale(now));

        Ok(u64::try_from(before - records.len()).unwrap_or(u64::MAX))
    }
}
