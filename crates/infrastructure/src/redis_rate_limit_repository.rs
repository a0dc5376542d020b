//! Redis-backed rate limit repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use redis::Script;
use skillswap_application::{AttemptInfo, RateLimitRepository};
use skillswap_core::{AppError, AppResult};

const RECORD_ATTEMPT_SCRIPT: &str = r#"
local key = KEYS[1]
local window_ms = tonumber(ARGV[1])

local count = redis.call('INCR', key)
local ttl = redis.call('PTTL', key)

if ttl < 0 then
  redis.call('PEXPIRE', key, window_ms)
  ttl = window_ms
end

return {count, ttl}
"#;

/// Redis implementation of the rate limit repository port.
///
/// Counters are shared by every API instance pointing at the same Redis.
#[derive(Clone)]
pub struct RedisRateLimitRepository {
    client: redis::Client,
    key_prefix: String,
}

impl RedisRateLimitRepository {
    /// Creates a repository with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }
}

#[async_trait]
impl RateLimitRepository for RedisRateLimitRepository {
    async fn record_attempt(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo> {
        let window_ms = window.num_milliseconds();
        if window_ms <= 0 {
            return Err(AppError::Validation(
                "rate limit window must be at least one millisecond".to_owned(),
            ));
        }

        let redis_key = self.key_for(key);

        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        let script = Script::new(RECORD_ATTEMPT_SCRIPT);
        let (attempt_count, ttl_ms): (i64, i64) = script
            .key(redis_key)
            .arg(window_ms)
            .invoke_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to record redis rate limit attempt: {error}"
                ))
            })?;

        let attempt_count = u32::try_from(attempt_count)
            .map_err(|error| AppError::Internal(format!("invalid redis attempt count: {error}")))?;

        Ok(AttemptInfo {
            attempt_count,
            window_ends_at: now
                .checked_add_signed(Duration::milliseconds(ttl_ms.max(0)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    async fn cleanup_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
        // Redis rate limit keys expire automatically via PEXPIRE.
        Ok(0)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
