// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Comments on submissions.

use crate::clock::{DateTime, HasAge, Utc};
use crate::models::{Thing, ThingData};

/// A Reddit comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    data: ThingData,
}

impl Comment {
    /// Creates a comment from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the comment's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The comment's base36 ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// The comment's fullname, such as `t1_c0s4w1c`.
    pub fn fullname(&self) -> &str {
        self.data.str("name").unwrap_or_default()
    }

    /// Username of the comment's author.
    pub fn author(&self) -> &str {
        self.data.str("author").unwrap_or_default()
    }

    /// Name of the subreddit the comment was posted in.
    pub fn subreddit(&self) -> &str {
        self.data.str("subreddit").unwrap_or_default()
    }

    /// Fullname of the submission the comment belongs to.
    pub fn link_id(&self) -> &str {
        self.data.str("link_id").unwrap_or_default()
    }

    /// Fullname of the comment's parent, which is either the submission or
    /// another comment.
    pub fn parent_id(&self) -> &str {
        self.data.str("parent_id").unwrap_or_default()
    }

    /// True if the comment is a direct reply to its submission.
    pub fn is_root(&self) -> bool {
        self.parent_id() == self.link_id()
    }

    /// Comment's permalink, relative to the Reddit website.
    pub fn permalink(&self) -> &str {
        self.data.str("permalink").unwrap_or_default()
    }

    /// Comment's body, with HTML entities decoded.
    pub fn body(&self) -> String {
        self.data.text("body").unwrap_or_default()
    }

    /// Comment's net score.
    pub fn score(&self) -> i64 {
        self.data.i64("score").unwrap_or_default()
    }

    /// Direct replies to this comment.
    ///
    /// Reddit sends replies as a nested listing, or as an empty string if
    /// there are none. Replies that were elided from the tree appear as
    /// [`Thing::MoreComments`].
    pub fn replies(&self) -> Vec<&Thing> {
        self.data
            .thing("replies")
            .and_then(Thing::as_listing)
            .map(|listing| listing.children())
            .unwrap_or_default()
    }
}

impl HasAge for Comment {
    fn created_utc(&self) -> DateTime<Utc> {
        self.data.timestamp("created_utc").unwrap_or_default()
    }
}
