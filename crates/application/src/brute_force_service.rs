//! Brute-force lockout ports and application service.

mod config;
mod ports;
mod service;


pub use config::{
    BruteForcePolicy, DEFAULT_LOCKOUT_SECONDS, DEFAULT_MAX_ATTEMPTS, DEFAULT_RESET_SECONDS,
};
pub use ports::AttemptRepository;
pub use service::BruteForceService;
