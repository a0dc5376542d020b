//! Time arithmetic shared by the throttling services.

use chrono::{DateTime, Duration, Utc};

/// Whole seconds from `now` until `instant`, rounded up and never negative.
///
/// Used for `Retry-After` values, so a wait of 1 ms reports 1 s.
#[must_use]
pub fn seconds_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (instant - now).num_milliseconds();
    u64::try_from(millis).map_or(0, |millis| millis.div_ceil(1000))
}

/// Whether `span` can be added to the current instant without leaving the
/// representable calendar.
pub(crate) fn span_fits_calendar(span: Duration) -> bool {
    Utc::now().checked_add_signed(span).is_some()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::{seconds_until, span_fits_calendar};

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000)
    }

    #[test]
    fn seconds_until_rounds_up_and_clamps() {
        assert_eq!(seconds_until(now() + Duration::milliseconds(1), now()), 1);
        assert_eq!(seconds_until(now() + Duration::milliseconds(1_001), now()), 2);
        assert_eq!(seconds_until(now() + Duration::seconds(900), now()), 900);
        assert_eq!(seconds_until(now(), now()), 0);
        assert_eq!(seconds_until(now() - Duration::seconds(5), now()), 0);
    }

    #[test]
    fn seconds_until_handles_the_calendar_bounds() {
        assert!(seconds_until(DateTime::<Utc>::MAX_UTC, now()) > 0);
        assert_eq!(seconds_until(DateTime::<Utc>::MIN_UTC, now()), 0);
    }

    #[test]
    fn calendar_fit_rejects_spans_past_the_last_instant() {
        assert!(span_fits_calendar(Duration::days(365)));
        assert!(!span_fits_calendar(Duration::MAX));
        assert!(!span_fits_calendar(Duration::days(100_000_000)));
    }
}
