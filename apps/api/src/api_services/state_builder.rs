use std::sync::Arc;

use skillswap_application::PasswordHasher;
use skillswap_core::{AppResult, Clock, SystemClock};
use skillswap_infrastructure::{Argon2PasswordHasher, BackgroundSweeper};
use tracing::info;

use crate::api_config::{ApiConfig, RateLimitStoreConfig};
use crate::state::AppState;

use super::redis::build_redis_client;

mod accounts;
mod throttling;

/// Request state plus the background tasks that keep its stores bounded.
pub struct ApiServices {
    pub state: AppState,
    pub sweepers: Vec<BackgroundSweeper>,
}

pub fn build_app_state(config: &ApiConfig) -> AppResult<ApiServices> {
    build_app_state_with(
        config,
        Arc::new(SystemClock),
        Arc::new(Argon2PasswordHasher::new()),
    )
}

pub fn build_app_state_with(
    config: &ApiConfig,
    clock: Arc<dyn Clock>,
    password_hasher: Arc<dyn PasswordHasher>,
) -> AppResult<ApiServices> {
    let redis_client = config
        .redis_url
        .as_deref()
        .map(build_redis_client)
        .transpose()?;

    let rate_limit_service =
        throttling::build_rate_limit_service(config, redis_client, clock.clone())?;
    let rate_limit_rules = throttling::build_rate_limit_rules()?;
    let brute_force_service = accounts::build_brute_force_service(clock.clone());
    let account_service = accounts::build_account_service(
        config,
        password_hasher,
        brute_force_service.clone(),
        clock.clone(),
    );

    let mut sweepers = vec![BackgroundSweeper::spawn(
        Arc::new(brute_force_service),
        config.sweep_interval,
    )?];
    if config.rate_limit_store == RateLimitStoreConfig::Memory {
        sweepers.push(BackgroundSweeper::spawn(
            Arc::new(rate_limit_service.clone()),
            config.sweep_interval,
        )?);
    }

    info!(
        rate_limit_store = rate_limit_service.backend_name(),
        sweepers = sweepers.len(),
        "application services ready"
    );

    Ok(ApiServices {
        state: AppState {
            account_service,
            rate_limit_service,
            rate_limit_rules,
            clock,
        },
        sweepers,
    })
}
