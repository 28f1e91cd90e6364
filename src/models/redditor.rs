// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reddit user accounts.

use crate::clock::{DateTime, HasAge, Utc};
use crate::models::ThingData;

/// A Reddit user account.
#[derive(Debug, Clone, PartialEq)]
pub struct Redditor {
    data: ThingData,
}

impl Redditor {
    /// Creates a redditor from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the redditor's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The account's base36 ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// The account's username.
    pub fn name(&self) -> &str {
        self.data.str("name").unwrap_or_default()
    }

    /// User's current karma for submissions.
    pub fn link_karma(&self) -> i64 {
        self.data.i64("link_karma").unwrap_or_default()
    }

    /// User's current karma for comments.
    pub fn comment_karma(&self) -> i64 {
        self.data.i64("comment_karma").unwrap_or_default()
    }

    /// True if the user is a Reddit employee.
    pub fn is_employee(&self) -> bool {
        self.data.bool("is_employee").unwrap_or_default()
    }
}

impl HasAge for Redditor {
    fn created_utc(&self) -> DateTime<Utc> {
        self.data.timestamp("created_utc").unwrap_or_default()
    }
}
