// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Custom feeds.

use crate::models::ThingData;
use serde_json::Value;

/// A custom feed combining several subreddits.
#[derive(Debug, Clone, PartialEq)]
pub struct Multireddit {
    data: ThingData,
}

impl Multireddit {
    /// Creates a multireddit from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the multireddit's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The multireddit's name.
    pub fn name(&self) -> &str {
        self.data.str("name").unwrap_or_default()
    }

    /// Path to the multireddit, such as `/user/spez/m/cats`.
    pub fn path(&self) -> &str {
        self.data.str("path").unwrap_or_default()
    }

    /// Names of the subreddits in the multireddit.
    pub fn subreddits(&self) -> Vec<&str> {
        self.data
            .raw("subreddits")
            .and_then(Value::as_array)
            .map(|subreddits| {
                subreddits
                    .iter()
                    .filter_map(|subreddit| subreddit.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}
