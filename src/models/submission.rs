// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Link and self posts.

use crate::clock::{DateTime, HasAge, Utc};
use crate::models::{Thing, ThingData};

/// A Reddit post.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    data: ThingData,
    comments: Vec<Thing>,
}

impl Submission {
    /// Creates a submission from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self {
            data,
            comments: Vec::new(),
        }
    }

    /// Attaches the submission's top-level comments.
    pub fn with_comments(mut self, comments: Vec<Thing>) -> Self {
        self.comments = comments;
        self
    }

    /// All of the submission's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The submission's base36 ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// The submission's fullname, such as `t3_2gmzqe`.
    pub fn fullname(&self) -> &str {
        self.data.str("name").unwrap_or_default()
    }

    /// Username of the submission's author.
    pub fn author(&self) -> &str {
        self.data.str("author").unwrap_or_default()
    }

    /// Name of the subreddit the submission was posted to.
    pub fn subreddit(&self) -> &str {
        self.data.str("subreddit").unwrap_or_default()
    }

    /// Submission's title, with HTML entities decoded.
    pub fn title(&self) -> String {
        self.data.text("title").unwrap_or_default()
    }

    /// Body of a self post, with HTML entities decoded.
    ///
    /// Link posts have an empty body.
    pub fn selftext(&self) -> String {
        self.data.text("selftext").unwrap_or_default()
    }

    /// URL the submission links to. Self posts link to themselves.
    pub fn url(&self) -> &str {
        self.data.str("url").unwrap_or_default()
    }

    /// Submission's permalink, relative to the Reddit website.
    pub fn permalink(&self) -> &str {
        self.data.str("permalink").unwrap_or_default()
    }

    /// Submission's net score.
    pub fn score(&self) -> i64 {
        self.data.i64("score").unwrap_or_default()
    }

    /// Number of comments on the submission.
    pub fn num_comments(&self) -> i64 {
        self.data.i64("num_comments").unwrap_or_default()
    }

    /// True if the submission is marked NSFW.
    pub fn is_nsfw(&self) -> bool {
        self.data.bool("over_18").unwrap_or_default()
    }

    /// True if the submission is a self (text) post.
    pub fn is_self(&self) -> bool {
        self.data.bool("is_self").unwrap_or_default()
    }

    /// Top-level comments, if they were fetched along with the submission.
    pub fn comments(&self) -> &[Thing] {
        &self.comments
    }
}

impl HasAge for Submission {
    fn created_utc(&self) -> DateTime<Utc> {
        self.data.timestamp("created_utc").unwrap_or_default()
    }
}
