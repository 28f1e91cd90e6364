// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, Local, TimeDelta, Utc};
use std::ops::Sub;

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Marks a thing that has a notion of its age.
pub trait HasAge {
    /// The date the item was created, in UTC.
    fn created_utc(&self) -> DateTime<Utc>;

    /// The date the item was created, in local time.
    fn created_local(&self) -> DateTime<Local> {
        self.created_utc().with_timezone(&Local)
    }

    /// The age of the item.
    ///
    /// `clock` is a source of time from which the age can be derived.
    /// Generally [`SystemClock::default()`] is used.
    fn age<C: Clock>(&self, clock: &C) -> TimeDelta {
        let birthday = self.created_utc();
        clock.now().sub(birthday)
    }
}

/// Converts a Reddit timestamp, which is a floating-point number of seconds
/// since the Unix epoch, into a UTC date.
///
/// Out-of-range timestamps are clamped to the epoch.
///
/// # Examples
///
/// ```
/// use arraw::clock::from_timestamp;
/// let date = from_timestamp(1206917726.0);
/// assert_eq!(date.to_rfc3339(), "2008-03-30T22:55:26+00:00");
/// ```
pub fn from_timestamp(secs: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs.trunc() as i64, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    mod clock {
        use super::super::*;
        use std::ops::Sub;

        #[test]
        fn it_returns_the_system_time() {
            let clock = SystemClock;
            let delta = Utc::now().sub(clock.now());
            let secs = delta.num_seconds();
            assert_eq!(secs, 0);
        }
    }

    mod has_age {
        use super::super::*;
        use crate::test_utils::FrozenClock;

        #[derive(Debug)]
        struct ThingWithAge {
            created_utc: DateTime<Utc>,
        }

        impl ThingWithAge {
            pub fn new(timestamp: i64) -> Self {
                let created_utc = DateTime::from_timestamp(timestamp, 0).unwrap();
                Self { created_utc }
            }
        }

        impl HasAge for ThingWithAge {
            fn created_utc(&self) -> DateTime<Utc> {
                self.created_utc
            }
        }

        #[test]
        fn it_returns_its_age() {
            let clock = FrozenClock::default();
            let thing = ThingWithAge::new(clock.now().timestamp() - 3600);
            assert_eq!(thing.age(&clock).num_seconds(), 3600);
        }

        #[test]
        fn it_returns_its_creation_date_in_local_time() {
            let thing = ThingWithAge::new(1744177355);
            assert_eq!(thing.created_local().timestamp(), 1744177355);
        }
    }

    mod timestamps {
        use super::super::*;

        #[test]
        fn it_truncates_fractional_seconds() {
            let date = from_timestamp(1744177355.75);
            assert_eq!(date.timestamp(), 1744177355);
        }

        #[test]
        fn it_clamps_out_of_range_timestamps_to_the_epoch() {
            let date = from_timestamp(f64::MAX);
            assert_eq!(date.timestamp(), 0);
        }
    }
}
