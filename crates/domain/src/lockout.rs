//! Failed-attempt tracking and timed lockout.
//!
//! An identifier moves `Fresh -> Accumulating -> Locked` as failures are
//! recorded and returns to `Fresh` once the lock elapses, the record goes
//! stale, or the caller resets it after a successful authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::rate_limit::instant_after;

/// Lifecycle state of an identifier's failed-attempt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// No failures counted.
    Fresh,
    /// Failures counted, below the threshold.
    Accumulating,
    /// Threshold reached and the lock has not elapsed yet.
    Locked,
}

/// Answer to "may this identifier attempt authentication now?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStatus {
    /// Whether another attempt is allowed.
    pub allowed: bool,
    /// Failures left before the identifier is locked.
    pub remaining_attempts: u32,
    /// End of the active lock, if any.
    pub locked_until: Option<DateTime<Utc>>,
}

/// Failed-attempt counter for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    count: u32,
    reset_at: DateTime<Utc>,
    locked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Creates an empty record that goes stale `reset_window` after `now`.
    #[must_use]
    pub fn fresh(now: DateTime<Utc>, reset_window: Duration) -> Self {
        Self {
            count: 0,
            reset_at: instant_after(now, reset_window),
            locked_until: None,
        }
    }

    /// Returns whether a lock is active at `now`.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Returns whether the record has outlived its reset window.
    ///
    /// An active lock keeps the record alive until the lock elapses.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.reset_at < now && !self.is_locked(now)
    }

    /// Brings the record up to date at `now`.
    ///
    /// Stale records restart from zero and elapsed locks are cleared together
    /// with the count that triggered them.
    pub fn normalize(&mut self, now: DateTime<Utc>, reset_window: Duration) {
        if self.is_stale(now) {
            *self = Self::fresh(now, reset_window);
            return;
        }

        if self.locked_until.is_some_and(|until| until <= now) {
            self.count = 0;
            self.locked_until = None;
        }
    }

    /// Counts one failed attempt and locks once `max_attempts` is reached.
    pub fn register_failure(
        &mut self,
        now: DateTime<Utc>,
        max_attempts: u32,
        lockout_duration: Duration,
    ) {
        self.count = self.count.saturating_add(1);
        if self.count >= max_attempts {
            self.locked_until = Some(instant_after(now, lockout_duration));
        }
    }

    /// Reports whether another attempt is allowed at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>, max_attempts: u32) -> AttemptStatus {
        if self.is_locked(now) {
            return AttemptStatus {
                allowed: false,
                remaining_attempts: 0,
                locked_until: self.locked_until,
            };
        }

        AttemptStatus {
            allowed: self.count < max_attempts,
            remaining_attempts: max_attempts.saturating_sub(self.count),
            locked_until: None,
        }
    }

    /// Classifies the record at `now`.
    #[must_use]
    pub fn state(&self, now: DateTime<Utc>) -> AttemptState {
        if self.is_locked(now) {
            AttemptState::Locked
        } else if self.count == 0 || self.is_stale(now) {
            AttemptState::Fresh
        } else {
            AttemptState::Accumulating
        }
    }

    /// Failed attempts counted since the last reset.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Instant after which the record is considered stale.
    #[must_use]
    pub fn reset_at(&self) -> DateTime<Utc> {
        self.reset_at
    }

    /// End of the most recent lock, elapsed or not.
    #[must_use]
    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }
}
