// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. Every
//! thing arrives wrapped in an envelope tagged with its kind; the
//! [objector](crate::objector) unwraps the envelope and builds the matching
//! [`Thing`] variant from the envelope's attributes.
//!
//! Models keep all of the attributes Reddit sent in their [`ThingData`] and
//! offer typed accessors for the commonly used ones. Attributes that are
//! themselves things, such as a comment's replies, have already been
//! converted into models.

pub mod comment;
pub mod listing;
pub mod message;
pub mod multireddit;
pub mod redditor;
pub mod submission;
pub mod subreddit;
pub mod trophy;
pub mod widget;

pub use comment::Comment;
pub use listing::{Listing, MoreComments};
pub use message::Message;
pub use multireddit::Multireddit;
pub use redditor::Redditor;
pub use submission::Submission;
pub use subreddit::Subreddit;
pub use trophy::{Trophy, TrophyList};
pub use widget::Widget;

use crate::clock::{self, DateTime, Utc};
use crate::objector::Object;
use crate::text::convert_html_entities;
use serde_json::Value;
use std::collections::BTreeMap;

/// Any object returned by the Reddit API.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    /// A comment on a submission.
    Comment(Comment),
    /// A private message.
    Message(Message),
    /// A user account.
    Redditor(Redditor),
    /// A link or self post.
    Submission(Submission),
    /// A community.
    Subreddit(Subreddit),
    /// An award displayed on a user's profile.
    Trophy(Trophy),
    /// A collection of trophies.
    TrophyList(TrophyList),
    /// A page of things.
    Listing(Listing),
    /// A placeholder for comments that were not included in a comment tree.
    MoreComments(MoreComments),
    /// A custom feed combining several subreddits.
    Multireddit(Multireddit),
    /// A subreddit sidebar widget.
    Widget(Widget),
}

impl Thing {
    /// All of the thing's attributes.
    pub fn data(&self) -> &ThingData {
        match self {
            Thing::Comment(thing) => thing.data(),
            Thing::Message(thing) => thing.data(),
            Thing::Redditor(thing) => thing.data(),
            Thing::Submission(thing) => thing.data(),
            Thing::Subreddit(thing) => thing.data(),
            Thing::Trophy(thing) => thing.data(),
            Thing::TrophyList(thing) => thing.data(),
            Thing::Listing(thing) => thing.data(),
            Thing::MoreComments(thing) => thing.data(),
            Thing::Multireddit(thing) => thing.data(),
            Thing::Widget(thing) => thing.data(),
        }
    }

    /// The thing's base36 ID, if it has one.
    pub fn id(&self) -> Option<&str> {
        self.data().str("id")
    }

    /// The thing's fullname, such as `t3_2gmzqe`, if it has one.
    pub fn fullname(&self) -> Option<&str> {
        self.data().str("name").filter(|name| name.contains('_'))
    }

    /// The thing as a comment, if it is one.
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Thing::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// The thing as a submission, if it is one.
    pub fn as_submission(&self) -> Option<&Submission> {
        match self {
            Thing::Submission(submission) => Some(submission),
            _ => None,
        }
    }

    /// The thing as a listing, if it is one.
    pub fn as_listing(&self) -> Option<&Listing> {
        match self {
            Thing::Listing(listing) => Some(listing),
            _ => None,
        }
    }
}

/// The attributes of a thing, with nested things already objectified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThingData(BTreeMap<String, Object>);

impl ThingData {
    /// Creates an empty set of attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Object) -> Option<Object> {
        self.0.insert(key.into(), value)
    }

    /// Removes the attribute `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.0.remove(key)
    }

    /// The attribute `key`.
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.0.get(key)
    }

    /// True if the attribute `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Names of all attributes, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The attribute `key` as raw JSON, if it was not objectified.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Object::as_raw)
    }

    /// The attribute `key` as a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.raw(key).and_then(Value::as_str)
    }

    /// The attribute `key` as a string with HTML entities decoded.
    pub fn text(&self, key: &str) -> Option<String> {
        self.str(key).map(convert_html_entities)
    }

    /// The attribute `key` as an integer.
    pub fn i64(&self, key: &str) -> Option<i64> {
        self.raw(key).and_then(Value::as_i64)
    }

    /// The attribute `key` as a floating-point number.
    pub fn f64(&self, key: &str) -> Option<f64> {
        self.raw(key).and_then(Value::as_f64)
    }

    /// The attribute `key` as a boolean.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.raw(key).and_then(Value::as_bool)
    }

    /// The attribute `key` as a UTC timestamp.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.f64(key).map(clock::from_timestamp)
    }

    /// The attribute `key` as a thing.
    pub fn thing(&self, key: &str) -> Option<&Thing> {
        self.get(key).and_then(Object::as_thing)
    }

    /// The attribute `key` as a list of strings.
    ///
    /// Non-string elements are skipped.
    pub fn strings(&self, key: &str) -> Vec<&str> {
        self.raw(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The attribute `key` as a list of things.
    ///
    /// Elements that are not things are skipped.
    pub fn things(&self, key: &str) -> Vec<&Thing> {
        match self.get(key) {
            Some(Object::List(items)) => items.iter().filter_map(Object::as_thing).collect(),
            Some(Object::Thing(thing)) => vec![thing],
            _ => Vec::new(),
        }
    }
}

impl FromIterator<(String, Object)> for ThingData {
    fn from_iter<I: IntoIterator<Item = (String, Object)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
