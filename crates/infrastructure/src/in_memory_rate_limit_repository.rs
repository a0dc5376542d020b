use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use skillswap_application::{AttemptInfo, RateLimitRepository};
use skillswap_core::{AppError, AppResult};
use skillswap_domain::RateLimitWindow;
use tokio::sync::Mutex;

/// Process-local rate limit counters.
///
/// One coarse lock guards the whole map; every operation holds it for O(1)
/// work except the sweep. Counters are lost on restart and are not shared
/// between processes.
#[derive(Default)]
pub struct InMemoryRateLimitRepository {
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl InMemoryRateLimitRepository {
    /// Creates an empty in-memory counter store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked keys, expired or not.
    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Returns whether no keys are tracked.
    pub async fn is_empty(&self) -> bool {
        self.windows.lock().await.is_empty()
    }
}

#[async_trait]
impl RateLimitRepository for InMemoryRateLimitRepository {
    async fn record_attempt(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo> {
        if window <= Duration::zero() {
            return Err(AppError::Validation(
                "rate limit window must be greater than zero".to_owned(),
            ));
        }

        let mut windows = self.windows.lock().await;
        let record = windows
            .entry(key.to_owned())
            .or_insert_with(|| RateLimitWindow::open(now, window));
        let attempt_count = record.register_hit(now, window);

        Ok(AttemptInfo {
            attempt_count,
            window_ends_at: record.window_end(),
        })
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, record| !record.is_expired(now));

        Ok(u64::try_from(before - windows.len()).unwrap_or(u64::MAX))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use skillswap_application::RateLimitRepository;
    use skillswap_core::AppResult;

    use super::InMemoryRateLimitRepository;

    fn start() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_500)
    }

    #[tokio::test]
    async fn counts_hits_within_window() -> AppResult<()> {
        let repository = InMemoryRateLimitRepository::new();
        let window = Duration::seconds(60);

        let first = repository.record_attempt("api:a", window, start()).await?;
        let second = repository
            .record_attempt("api:a", window, start() + Duration::seconds(30))
            .await?;

        assert_eq!(first.attempt_count, 1);
        assert_eq!(second.attempt_count, 2);
        assert_eq!(second.window_ends_at, start() + window);
        Ok(())
    }

    #[tokio::test]
    async fn expired_window_restarts_on_next_hit() -> AppResult<()> {
        let repository = InMemoryRateLimitRepository::new();
        let window = Duration::seconds(60);

        for _ in 0..7 {
            repository.record_attempt("api:a", window, start()).await?;
        }
        let later = start() + Duration::seconds(61);
        let info = repository.record_attempt("api:a", window, later).await?;

        assert_eq!(info.attempt_count, 1);
        assert_eq!(info.window_ends_at, later + window);
        Ok(())
    }

    #[tokio::test]
    async fn cleanup_drops_expired_keys_only() -> AppResult<()> {
        let repository = InMemoryRateLimitRepository::new();
        repository
            .record_attempt("short:a", Duration::seconds(5), start())
            .await?;
        repository
            .record_attempt("long:a", Duration::minutes(5), start())
            .await?;

        assert_eq!(repository.cleanup_expired(start()).await?, 0);
        assert_eq!(
            repository
                .cleanup_expired(start() + Duration::seconds(5))
                .await?,
            1
        );
        assert_eq!(repository.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_positive_window() {
        let repository = InMemoryRateLimitRepository::new();
        let result = repository
            .record_attempt("api:a", Duration::zero(), start())
            .await;
        assert!(result.is_err());
        assert!(repository.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_hits_are_never_lost() -> AppResult<()> {
        let repository = Arc::new(InMemoryRateLimitRepository::new());
        let window = Duration::minutes(1);

        let tasks = (0..64)
            .map(|_| {
                let repository = repository.clone();
                tokio::spawn(async move {
                    for _ in 0..10 {
                        repository.record_attempt("api:shared", window, start()).await?;
                    }
                    Ok::<(), skillswap_core::AppError>(())
                })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            task.await
                .map_err(|error| skillswap_core::AppError::Internal(error.to_string()))??;
        }

        let info = repository.record_attempt("api:shared", window, start()).await?;
        assert_eq!(info.attempt_count, 641);
        Ok(())
    }
}
