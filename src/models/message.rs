// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Private messages.

use crate::clock::{DateTime, HasAge, Utc};
use crate::models::ThingData;

/// A private message in a user's inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    data: ThingData,
}

impl Message {
    /// Creates a message from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the message's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The message's base36 ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// Username of the sender.
    pub fn author(&self) -> &str {
        self.data.str("author").unwrap_or_default()
    }

    /// Username of the recipient.
    pub fn dest(&self) -> &str {
        self.data.str("dest").unwrap_or_default()
    }

    /// Message subject, with HTML entities decoded.
    pub fn subject(&self) -> String {
        self.data.text("subject").unwrap_or_default()
    }

    /// Message body, with HTML entities decoded.
    pub fn body(&self) -> String {
        self.data.text("body").unwrap_or_default()
    }

    /// True if the message has not been read.
    pub fn is_new(&self) -> bool {
        self.data.bool("new").unwrap_or_default()
    }

    /// True if the message is a notification about a comment reply.
    pub fn was_comment(&self) -> bool {
        self.data.bool("was_comment").unwrap_or_default()
    }
}

impl HasAge for Message {
    fn created_utc(&self) -> DateTime<Utc> {
        self.data.timestamp("created_utc").unwrap_or_default()
    }
}
