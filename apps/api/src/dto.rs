use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillswap_application::AccountRecord;
use skillswap_domain::AccountId;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rate_limit_store: &'static str,
}

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Incoming payload for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Incoming payload for password login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub account: AccountResponse,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRecord> for AccountResponse {
    fn from(value: AccountRecord) -> Self {
        Self {
            id: value.id,
            username: value.username.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}
