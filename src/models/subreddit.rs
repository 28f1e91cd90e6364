// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Communities.

use crate::clock::{DateTime, HasAge, Utc};
use crate::models::ThingData;

/// A subreddit.
#[derive(Debug, Clone, PartialEq)]
pub struct Subreddit {
    data: ThingData,
}

impl Subreddit {
    /// Creates a subreddit from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the subreddit's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The subreddit's base36 ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// The subreddit's name, as it appears in URLs.
    pub fn display_name(&self) -> &str {
        self.data.str("display_name").unwrap_or_default()
    }

    /// The subreddit's title, with HTML entities decoded.
    pub fn title(&self) -> String {
        self.data.text("title").unwrap_or_default()
    }

    /// The short description shown to visitors, with HTML entities decoded.
    pub fn public_description(&self) -> String {
        self.data.text("public_description").unwrap_or_default()
    }

    /// Number of subscribers.
    pub fn subscribers(&self) -> i64 {
        self.data.i64("subscribers").unwrap_or_default()
    }

    /// True if the subreddit is marked NSFW.
    pub fn is_nsfw(&self) -> bool {
        self.data.bool("over18").unwrap_or_default()
    }

    /// Path to the subreddit, such as `/r/cats/`.
    pub fn url(&self) -> &str {
        self.data.str("url").unwrap_or_default()
    }
}

impl HasAge for Subreddit {
    fn created_utc(&self) -> DateTime<Utc> {
        self.data.timestamp("created_utc").unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objector::Object;
    use serde_json::json;

    #[test]
    fn it_returns_its_attributes() {
        let mut data = ThingData::new();
        data.insert("display_name", Object::Raw(json!("cats")));
        data.insert("public_description", Object::Raw(json!("Pictures &amp; videos of cats")));
        data.insert("subscribers", Object::Raw(json!(5000000)));
        data.insert("over18", Object::Raw(json!(false)));
        data.insert("url", Object::Raw(json!("/r/cats/")));

        let subreddit = Subreddit::new(data);
        assert_eq!(subreddit.display_name(), "cats");
        assert_eq!(subreddit.public_description(), "Pictures & videos of cats");
        assert_eq!(subreddit.subscribers(), 5000000);
        assert!(!subreddit.is_nsfw());
        assert_eq!(subreddit.url(), "/r/cats/");
    }
}
