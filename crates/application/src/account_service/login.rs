use chrono::{DateTime, Utc};
use skillswap_core::AppResult;

use super::{AccountRecord, AccountService};

/// Result of a password login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials were valid; the failure counter was reset.
    Authenticated(AccountRecord),
    /// Credentials were wrong; the failure was counted.
    Failed {
        /// Failures left before the lockout starts.
        remaining_attempts: u32,
    },
    /// The identifier is locked out; credentials were not checked.
    Locked {
        /// When the lock ends.
        locked_until: Option<DateTime<Utc>>,
    },
}

impl AccountService {
    /// Authenticates `username` with `password` behind the brute-force gate.
    ///
    /// The gate is keyed by `client` and username together. A locked key
    /// short-circuits before any hashing. Unknown usernames still pay for one
    /// hash.
    ///
    /// `client` is trusted as given. When it comes from forwarding headers,
    /// the deployment must sit behind a proxy that overwrites them; a caller
    /// able to pick its own `client` gets a fresh failure budget per value.
    /// Keying by username alone would close that gap but let anyone lock a
    /// known account out.
    pub async fn login(
        &self,
        client: &str,
        username: &str,
        password: &str,
    ) -> AppResult<LoginOutcome> {
        let gate_key = login_gate_key(client, username);
        let status = self
            .brute_force_service
            .check_status(&gate_key, &self.policy)
            .await?;

        if !status.allowed {
            return Ok(LoginOutcome::Locked {
                locked_until: status.locked_until,
            });
        }

        let account = self
            .account_repository
            .find_by_username(username.trim())
            .await?;

        let password_valid = match account {
            Some(ref account) => self
                .password_hasher
                .verify_password(password, &account.password_hash)?,
            None => {
                let _ = self.password_hasher.hash_password(password);
                false
            }
        };

        match account {
            Some(account) if password_valid => {
                self.brute_force_service.reset(&gate_key).await?;
                Ok(LoginOutcome::Authenticated(account))
            }
            _ => {
                let status = self
                    .brute_force_service
                    .record_failure(&gate_key, &self.policy)
                    .await?;

                if status.allowed {
                    Ok(LoginOutcome::Failed {
                        remaining_attempts: status.remaining_attempts,
                    })
                } else {
                    Ok(LoginOutcome::Locked {
                        locked_until: status.locked_until,
                    })
                }
            }
        }
    }
}

fn login_gate_key(client: &str, username: &str) -> String {
    format!("{client}:{}", username.trim())
}
