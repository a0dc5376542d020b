use chrono::Duration;

use skillswap_core::{AppError, AppResult};

use crate::timing::span_fits_calendar;

/// Default number of failures before a lockout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout length in seconds (15 minutes).
pub const DEFAULT_LOCKOUT_SECONDS: i64 = 15 * 60;

/// Default reset window in seconds (1 hour).
pub const DEFAULT_RESET_SECONDS: i64 = 60 * 60;

/// Thresholds for failed-attempt tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BruteForcePolicy {
    max_attempts: u32,
    lockout_duration: Duration,
    reset_window: Duration,
}

impl BruteForcePolicy {
    /// Creates a policy, rejecting zero attempts and durations that are not
    /// positive or do not fit the representable calendar.
    pub fn new(
        max_attempts: u32,
        lockout_duration: Duration,
        reset_window: Duration,
    ) -> AppResult<Self> {
        if max_attempts == 0 {
            return Err(AppError::Validation(
                "brute force max_attempts must be greater than zero".to_owned(),
            ));
        }

        if lockout_duration <= Duration::zero() {
            return Err(AppError::Validation(
                "brute force lockout duration must be greater than zero".to_owned(),
            ));
        }

        if reset_window <= Duration::zero() {
            return Err(AppError::Validation(
                "brute force reset window must be greater than zero".to_owned(),
            ));
        }

        if !span_fits_calendar(lockout_duration) || !span_fits_calendar(reset_window) {
            return Err(AppError::Validation(
                "brute force durations are too large".to_owned(),
            ));
        }

        Ok(Self {
            max_attempts,
            lockout_duration,
            reset_window,
        })
    }

    /// Failures allowed before the identifier is locked.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// How long a lock lasts once triggered.
    #[must_use]
    pub fn lockout_duration(&self) -> Duration {
        self.lockout_duration
    }

    /// How long an unlocked record is kept before it restarts from zero.
    #[must_use]
    pub fn reset_window(&self) -> Duration {
        self.reset_window
    }
}

impl Default for BruteForcePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_duration: Duration::seconds(DEFAULT_LOCKOUT_SECONDS),
            reset_window: Duration::seconds(DEFAULT_RESET_SECONDS),
        }
    }
}
