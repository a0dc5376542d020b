//! Fixed-window request counter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Request counter for one identifier inside one fixed window.
///
/// The counter only grows while `now < window_end`. The first hit at or after
/// `window_end` replaces the window with a fresh one starting at that hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    count: u32,
    window_end: DateTime<Utc>,
}

impl RateLimitWindow {
    /// Opens an empty window that ends `window` after `now`.
    #[must_use]
    pub fn open(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 0,
            window_end: instant_after(now, window),
        }
    }

    /// Counts one request, rolling the window over first if it has ended.
    ///
    /// Returns the count including this request.
    pub fn register_hit(&mut self, now: DateTime<Utc>, window: Duration) -> u32 {
        if self.is_expired(now) {
            *self = Self::open(now, window);
        }

        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Returns whether the window has ended at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_end
    }

    /// Number of requests counted in the current window.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Instant at which the window resets.
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_end
    }
}

/// `now + span`, saturating at the largest representable instant.
pub(crate) fn instant_after(now: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    now.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;

    use super::RateLimitWindow;

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_000)
    }

    #[test]
    fn hits_accumulate_inside_window() {
        let window = Duration::seconds(60);
        let mut record = RateLimitWindow::open(epoch(), window);

        assert_eq!(record.register_hit(epoch(), window), 1);
        assert_eq!(
            record.register_hit(epoch() + Duration::seconds(59), window),
            2
        );
        assert_eq!(record.window_end(), epoch() + window);
    }

    #[test]
    fn hit_at_window_end_starts_new_window() {
        let window = Duration::seconds(60);
        let mut record = RateLimitWindow::open(epoch(), window);
        record.register_hit(epoch(), window);
        record.register_hit(epoch(), window);

        let rollover = epoch() + window;
        assert_eq!(record.register_hit(rollover, window), 1);
        assert_eq!(record.window_end(), rollover + window);
    }

    #[test]
    fn expiry_is_inclusive_of_window_end() {
        let window = Duration::milliseconds(500);
        let record = RateLimitWindow::open(epoch(), window);

        assert!(!record.is_expired(epoch() + Duration::milliseconds(499)));
        assert!(record.is_expired(epoch() + window));
    }

    #[test]
    fn oversized_window_saturates_instead_of_overflowing() {
        let window = Duration::MAX;
        let mut record = RateLimitWindow::open(epoch(), window);

        assert_eq!(record.register_hit(epoch(), window), 1);
        assert_eq!(record.window_end(), DateTime::<Utc>::MAX_UTC);
        assert!(!record.is_expired(epoch() + Duration::days(365 * 1_000)));
    }

    proptest! {
        #[test]
        fn count_never_exceeds_hits_in_window(hits in 1_u32..200, window_ms in 1_i64..120_000) {
            let window = Duration::milliseconds(window_ms);
            let mut record = RateLimitWindow::open(epoch(), window);
            let mut last = 0;
            for _ in 0..hits {
                last = record.register_hit(epoch(), window);
            }
            prop_assert_eq!(last, hits);
            prop_assert_eq!(record.window_end(), epoch() + window);
        }
    }
}
