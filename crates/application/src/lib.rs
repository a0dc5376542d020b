//! Application services and ports.

#![forbid(unsafe_code)]

mod account_service;
mod brute_force_service;
mod maintenance;
mod rate_limit_service;
mod timing;

pub use account_service::{
    AccountRecord, AccountRepository, AccountService, LoginOutcome, PasswordHasher,
};
pub use brute_force_service::{
    AttemptRepository, BruteForcePolicy, BruteForceService, DEFAULT_LOCKOUT_SECONDS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RESET_SECONDS,
};
pub use maintenance::ExpiredEntrySweeper;
pub use rate_limit_service::{
    AttemptInfo, RateLimitDecision, RateLimitRepository, RateLimitRule, RateLimitService,
};
pub use timing::seconds_until;
