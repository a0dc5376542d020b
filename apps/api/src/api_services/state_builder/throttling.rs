use std::sync::Arc;

use chrono::Duration;
use skillswap_application::{RateLimitRepository, RateLimitRule, RateLimitService};
use skillswap_core::{AppError, AppResult, Clock};
use skillswap_infrastructure::{InMemoryRateLimitRepository, RedisRateLimitRepository};

use crate::api_config::{ApiConfig, RateLimitStoreConfig};
use crate::state::RateLimitRules;

pub(super) fn build_rate_limit_service(
    config: &ApiConfig,
    redis_client: Option<redis::Client>,
    clock: Arc<dyn Clock>,
) -> AppResult<RateLimitService> {
    let rate_limit_repository: Arc<dyn RateLimitRepository> = match config.rate_limit_store {
        RateLimitStoreConfig::Memory => Arc::new(InMemoryRateLimitRepository::new()),
        RateLimitStoreConfig::Redis => {
            let redis_client = redis_client.ok_or_else(|| {
                AppError::Validation("REDIS_URL is required when RATE_LIMIT_STORE=redis".to_owned())
            })?;
            Arc::new(RedisRateLimitRepository::new(
                redis_client,
                "skillswap:rate_limit",
            ))
        }
    };

    Ok(RateLimitService::new(rate_limit_repository, clock))
}

pub(super) fn build_rate_limit_rules() -> AppResult<RateLimitRules> {
    // Registration: 5 attempts per client per 15 minutes.
    let registration = RateLimitRule::new("registration", 5, Duration::minutes(15))?
        .with_message("too many registration attempts, try again later");
    // Login: 10 attempts per client per 15 minutes.
    let login = RateLimitRule::new("login", 10, Duration::minutes(15))?
        .with_message("too many login attempts, try again in 15 minutes");
    // General API: 100 requests per client per minute.
    let api = RateLimitRule::new("api", 100, Duration::minutes(1))?
        .with_message("too many requests, slow down");

    Ok(RateLimitRules {
        registration,
        login,
        api,
    })
}
