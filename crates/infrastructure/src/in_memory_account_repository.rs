use std::collections::HashMap;

use async_trait::async_trait;
use skillswap_application::{AccountRecord, AccountRepository};
use skillswap_core::{AppError, AppResult};
use tokio::sync::RwLock;

/// In-memory account directory keyed by username.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, AccountRecord>>,
}

impl InMemoryAccountRepository {
    /// Creates an empty account directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn create(&self, record: AccountRecord) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let username = record.username.as_str().to_owned();
        if accounts.contains_key(&username) {
            return Err(AppError::Conflict(format!(
                "username '{username}' is already taken"
            )));
        }

        accounts.insert(username, record);
        Ok(())
    }
}
