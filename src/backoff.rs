// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Backing off when Reddit asks the client to slow down.
//!
//! When an account submits content too quickly, Reddit rejects the request
//! with a `RATELIMIT` error whose message says how long to wait, such as
//! "Take a break for 7 seconds before trying again." If the wait is short
//! enough, the client sleeps and retries the request once.

use crate::error::ApiException;
use regex::Regex;
use std::sync::LazyLock;

/// Error type Reddit uses for rate-limit errors.
pub const RATELIMIT_ERROR: &str = "RATELIMIT";

static RATELIMIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}) (seconds?|minutes?)").expect("rate-limit pattern is valid")
});

/// Decides whether a rate-limited request is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    max_seconds: u64,
}

impl BackoffPolicy {
    /// Creates a policy that waits out rate limits of up to `max_seconds`.
    pub fn new(max_seconds: u64) -> Self {
        Self { max_seconds }
    }

    /// The longest delay, in seconds, this policy will wait out.
    pub fn max_seconds(&self) -> u64 {
        self.max_seconds
    }

    /// Returns the number of seconds to sleep before retrying the request
    /// that failed with `exception`, or `None` if it should not be retried.
    ///
    /// Only `RATELIMIT` errors are considered. The suggested sleep adds a
    /// small margin to the delay Reddit asked for, `min(delay / 10, 1)`
    /// seconds, so the retry does not land on the edge of Reddit's window.
    ///
    /// # Examples
    ///
    /// ```
    /// use arraw::backoff::BackoffPolicy;
    /// use arraw::error::{ApiErrorItem, ApiException};
    /// let exception = ApiException::new(vec![ApiErrorItem::new(
    ///     "RATELIMIT",
    ///     "Take a break for 7 seconds before trying again.",
    ///     Some("ratelimit"),
    /// )]);
    /// assert_eq!(BackoffPolicy::new(10).compute_backoff(&exception), Some(7.7));
    /// assert_eq!(BackoffPolicy::new(5).compute_backoff(&exception), None);
    /// ```
    pub fn compute_backoff(&self, exception: &ApiException) -> Option<f64> {
        for item in exception.items() {
            if item.error_type != RATELIMIT_ERROR {
                continue;
            }

            let captures = RATELIMIT_REGEX.captures(&item.message)?;
            let amount: u64 = captures[1].parse().ok()?;
            let seconds = if captures[2].starts_with("minute") {
                amount * 60
            } else {
                amount
            };

            if seconds <= self.max_seconds {
                let seconds = seconds as f64;
                return Some(seconds + (seconds / 10.0).min(1.0));
            }
        }
        None
    }
}
