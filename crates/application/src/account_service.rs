//! Account ports and application service.
//!
//! Owns registration and password login. Login is gated by the brute-force
//! tracker: the gate is consulted before the password comparison and only
//! charged after the credentials are confirmed wrong.

use std::sync::Arc;

use skillswap_core::{AppError, AppResult, Clock};
use skillswap_domain::{AccountId, Username, validate_password};

use crate::{BruteForcePolicy, BruteForceService};

mod login;
mod ports;


pub use login::LoginOutcome;
pub use ports::{AccountRecord, AccountRepository, PasswordHasher};

/// Application service for account registration and login.
#[derive(Clone)]
pub struct AccountService {
    account_repository: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    brute_force_service: BruteForceService,
    policy: BruteForcePolicy,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        brute_force_service: BruteForceService,
        policy: BruteForcePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            brute_force_service,
            policy,
            clock,
        }
    }

    /// Registers a new account with a hashed password.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<AccountRecord> {
        let username = Username::new(username)?;
        validate_password(password)?;

        if self
            .account_repository
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        let record = AccountRecord {
            id: AccountId::new(),
            username,
            password_hash: self.password_hasher.hash_password(password)?,
            created_at: self.clock.now(),
        };
        self.account_repository.create(record.clone()).await?;

        Ok(record)
    }

    /// Finds an account by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<AccountRecord> {
        self.account_repository
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("account '{}' does not exist", username.trim()))
            })
    }
}
