use async_trait::async_trait;
use chrono::{DateTime, Utc};

use skillswap_core::AppResult;
use skillswap_domain::{AccountId, Username};

/// Account record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Unique account identifier.
    pub id: AccountId,
    /// Login name.
    pub username: Username,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Repository port for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>>;

    /// Stores a new account. Fails with `Conflict` when the username is taken.
    async fn create(&self, record: AccountRecord) -> AppResult<()>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
