//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod background_sweeper;
mod in_memory_account_repository;
mod in_memory_attempt_repository;
mod in_memory_rate_limit_repository;
mod redis_rate_limit_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use background_sweeper::BackgroundSweeper;
pub use in_memory_account_repository::InMemoryAccountRepository;
pub use in_memory_attempt_repository::InMemoryAttemptRepository;
pub use in_memory_rate_limit_repository::InMemoryRateLimitRepository;
pub use redis_rate_limit_repository::RedisRateLimitRepository;
