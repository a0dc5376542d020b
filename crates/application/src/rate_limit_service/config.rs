use chrono::{DateTime, Duration, Utc};

use skillswap_core::{AppError, AppResult};

use crate::timing::{seconds_until, span_fits_calendar};

/// Configuration for a rate limit rule.
///
/// The category namespaces the counters, so two rules never share a count for
/// the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRule {
    category: String,
    max_requests: u32,
    window: Duration,
    message: Option<String>,
}

impl RateLimitRule {
    /// Creates a new rate limit rule.
    ///
    /// Fails when the category is blank, `max_requests` is zero, or the window
    /// is not strictly positive or ends beyond the representable calendar.
    pub fn new(
        category: impl Into<String>,
        max_requests: u32,
        window: Duration,
    ) -> AppResult<Self> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(AppError::Validation(
                "rate limit category must not be empty".to_owned(),
            ));
        }

        if max_requests == 0 {
            return Err(AppError::Validation(format!(
                "rate limit '{category}' must allow at least one request"
            )));
        }

        if window <= Duration::zero() {
            return Err(AppError::Validation(format!(
                "rate limit '{category}' window must be greater than zero"
            )));
        }

        if !span_fits_calendar(window) {
            return Err(AppError::Validation(format!(
                "rate limit '{category}' window is too large"
            )));
        }

        Ok(Self {
            category,
            max_requests,
            window,
            message: None,
        })
    }

    /// Attaches the message reported when a request is denied.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The rule's namespace, e.g. `login` or `registration`.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Maximum number of requests allowed per window.
    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Message reported on denial, if configured.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(super) fn key_for(&self, identifier: &str) -> String {
        format!("{}:{identifier}", self.category)
    }
}

/// Outcome of one rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request fits in the current window.
    pub allowed: bool,
    /// The rule's maximum per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: DateTime<Utc>,
    /// Denial message; only set when denied and the rule carries one.
    pub message: Option<String>,
}

impl RateLimitDecision {
    pub(super) fn evaluate(
        rule: &RateLimitRule,
        attempt_count: u32,
        reset_at: DateTime<Utc>,
    ) -> Self {
        let allowed = attempt_count <= rule.max_requests;
        let message = if allowed {
            None
        } else {
            rule.message.clone()
        };

        Self {
            allowed,
            limit: rule.max_requests,
            remaining: rule.max_requests.saturating_sub(attempt_count),
            reset_at,
            message,
        }
    }

    /// Whole seconds until the window resets, rounded up and never negative.
    #[must_use]
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> u64 {
        seconds_until(self.reset_at, now)
    }
}
