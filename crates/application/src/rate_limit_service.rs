//! Rate limiting ports and application service.
//!
//! Implements a fixed-window counter per `(rule category, identifier)` pair.
//! The counter store is a port so a single process can keep counters in
//! memory while a horizontally scaled deployment shares them through Redis.

mod config;
mod ports;
mod service;


pub use config::{RateLimitDecision, RateLimitRule};
pub use ports::{AttemptInfo, RateLimitRepository};
pub use service::RateLimitService;
