use std::sync::Arc;

use skillswap_application::{AccountService, BruteForceService, PasswordHasher};
use skillswap_core::Clock;
use skillswap_infrastructure::{InMemoryAccountRepository, InMemoryAttemptRepository};

use crate::api_config::ApiConfig;

pub(super) fn build_brute_force_service(clock: Arc<dyn Clock>) -> BruteForceService {
    BruteForceService::new(Arc::new(InMemoryAttemptRepository::new()), clock)
}

pub(super) fn build_account_service(
    config: &ApiConfig,
    password_hasher: Arc<dyn PasswordHasher>,
    brute_force_service: BruteForceService,
    clock: Arc<dyn Clock>,
) -> AccountService {
    AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        password_hasher,
        brute_force_service,
        config.brute_force_policy,
        clock,
    )
}
