//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod lockout;
mod rate_limit;

pub use account::{
    AccountId, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, Username, validate_password,
};
pub use lockout::{AttemptRecord, AttemptState, AttemptStatus};
pub use rate_limit::RateLimitWindow;
