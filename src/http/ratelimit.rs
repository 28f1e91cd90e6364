// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Bookkeeping for Reddit's rate-limit response headers.
//!
//! Every API response reports how many requests remain in the current
//! window (`x-ratelimit-remaining`) and how many seconds until the window
//! resets (`x-ratelimit-reset`). Once the budget is exhausted, requests are
//! held back until the window resets.

use reqwest::header::HeaderMap;
use std::time::Duration;
use tokio::time::Instant;

const REMAINING: &str = "x-ratelimit-remaining";
const RESET: &str = "x-ratelimit-reset";

/// Tracks the request budget reported by Reddit.
#[derive(Debug, Default, Clone)]
pub struct RateLimiter {
    remaining: Option<f64>,
    reset_at: Option<Instant>,
}

impl RateLimiter {
    /// Records the budget reported in a response's `headers`, received at
    /// `now`.
    ///
    /// Responses without usable rate-limit headers leave the budget
    /// unchanged.
    pub fn update(&mut self, headers: &HeaderMap, now: Instant) {
        let remaining = header_number(headers, REMAINING);
        let reset_at = header_number(headers, RESET)
            .and_then(|reset| Duration::try_from_secs_f64(reset.max(0.0)).ok())
            .and_then(|reset| now.checked_add(reset));
        if let (Some(remaining), Some(reset_at)) = (remaining, reset_at) {
            self.remaining = Some(remaining);
            self.reset_at = Some(reset_at);
        }
    }

    /// How long the next request sent at `now` has to wait, if at all.
    pub fn delay(&self, now: Instant) -> Option<Duration> {
        match (self.remaining, self.reset_at) {
            (Some(remaining), Some(reset_at)) if remaining < 1.0 && reset_at > now => {
                Some(reset_at - now)
            }
            _ => None,
        }
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<f64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
