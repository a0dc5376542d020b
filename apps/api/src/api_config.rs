use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use skillswap_application::{
    BruteForcePolicy, DEFAULT_LOCKOUT_SECONDS, DEFAULT_MAX_ATTEMPTS, DEFAULT_RESET_SECONDS,
};
use skillswap_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 5 * 60;

/// Backing store for rate-limit windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStoreConfig {
    /// Process-local windows, swept in the background.
    Memory,
    /// Shared windows in Redis, expired by key TTL.
    Redis,
}

impl RateLimitStoreConfig {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(AppError::Validation(format!(
                "RATE_LIMIT_STORE must be either 'memory' or 'redis', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub rate_limit_store: RateLimitStoreConfig,
    pub redis_url: Option<String>,
    pub sweep_interval: StdDuration,
    pub brute_force_policy: BruteForcePolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let rate_limit_store = RateLimitStoreConfig::parse(
            &env::var("RATE_LIMIT_STORE").unwrap_or_else(|_| "memory".to_owned()),
        )?;
        let redis_url = optional_non_empty_env("REDIS_URL");
        if rate_limit_store == RateLimitStoreConfig::Redis && redis_url.is_none() {
            return Err(AppError::Validation(
                "REDIS_URL is required when RATE_LIMIT_STORE=redis".to_owned(),
            ));
        }

        let sweep_interval_seconds = parsed_env::<u64>(
            "RATE_LIMIT_SWEEP_INTERVAL_SECONDS",
            DEFAULT_SWEEP_INTERVAL_SECONDS,
        )?;
        if sweep_interval_seconds == 0 {
            return Err(AppError::Validation(
                "RATE_LIMIT_SWEEP_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let brute_force_policy = BruteForcePolicy::new(
            parsed_env::<u32>("BRUTE_FORCE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            parsed_seconds_env("BRUTE_FORCE_LOCKOUT_SECONDS", DEFAULT_LOCKOUT_SECONDS)?,
            parsed_seconds_env("BRUTE_FORCE_RESET_SECONDS", DEFAULT_RESET_SECONDS)?,
        )?;

        Ok(Self {
            api_host,
            api_port,
            rate_limit_store,
            redis_url,
            sweep_interval: StdDuration::from_secs(sweep_interval_seconds),
            brute_force_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_non_empty_env(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn parsed_seconds_env(name: &str, default: i64) -> Result<Duration, AppError> {
    seconds_to_duration(name, parsed_env::<i64>(name, default)?)
}

fn seconds_to_duration(name: &str, seconds: i64) -> Result<Duration, AppError> {
    Duration::try_seconds(seconds)
        .ok_or_else(|| AppError::Validation(format!("{name} is out of range: {seconds}")))
}
