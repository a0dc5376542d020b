use std::sync::Arc;

use skillswap_application::{AccountService, RateLimitRule, RateLimitService};
use skillswap_core::Clock;

/// Per-route-group rate limit rules.
#[derive(Debug, Clone)]
pub struct RateLimitRules {
    pub registration: RateLimitRule,
    pub login: RateLimitRule,
    pub api: RateLimitRule,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub rate_limit_service: RateLimitService,
    pub rate_limit_rules: RateLimitRules,
    pub clock: Arc<dyn Clock>,
}
