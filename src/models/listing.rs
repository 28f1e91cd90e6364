// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Listings, Reddit's pages of things.

use crate::models::{Thing, ThingData};
use crate::objector::Object;

/// A page of things, with cursors to the neighboring pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    data: ThingData,
}

impl Listing {
    /// Creates a listing from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the listing's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The things on this page, in the order Reddit returned them.
    pub fn children(&self) -> Vec<&Thing> {
        self.data.things("children")
    }

    /// Consumes the listing, returning the things on this page.
    pub fn into_children(mut self) -> Vec<Thing> {
        match self.data.remove("children") {
            Some(Object::List(items)) => items.into_iter().filter_map(Object::into_thing).collect(),
            Some(Object::Thing(thing)) => vec![thing],
            _ => Vec::new(),
        }
    }

    /// Cursor pointing at the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.data.str("after").filter(|after| !after.is_empty())
    }

    /// Cursor pointing at the previous page, if there is one.
    pub fn before(&self) -> Option<&str> {
        self.data.str("before").filter(|before| !before.is_empty())
    }
}

/// Comments that were elided from a comment tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MoreComments {
    data: ThingData,
}

impl MoreComments {
    /// Creates a placeholder from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the placeholder's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// Base36 IDs of the elided comments.
    pub fn children(&self) -> Vec<&str> {
        self.data.strings("children")
    }

    /// Number of elided comments, including their descendants.
    pub fn count(&self) -> i64 {
        self.data.i64("count").unwrap_or_default()
    }

    /// Fullname of the elided comments' parent.
    pub fn parent_id(&self) -> &str {
        self.data.str("parent_id").unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objector::Objector;
    use crate::test_utils::load_data;

    fn listing() -> Listing {
        let objector = Objector::default();
        match objector.objectify(load_data("listing_page_1")).unwrap().into_thing() {
            Some(Thing::Listing(listing)) => listing,
            other => panic!("expected a listing, got {other:?}"),
        }
    }

    #[test]
    fn it_returns_its_children_in_order() {
        let listing = listing();
        let ids: Vec<_> = listing.children().into_iter().filter_map(Thing::id).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn it_gives_up_its_children() {
        let children = listing().into_children();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|thing| thing.as_submission().is_some()));
    }

    #[test]
    fn it_returns_its_cursors() {
        let listing = listing();
        assert_eq!(listing.after(), Some("t3_a2"));
        assert_eq!(listing.before(), None);
    }

    #[test]
    fn it_has_no_children_when_empty() {
        let mut data = ThingData::new();
        data.insert("children", Object::Raw(serde_json::json!([])));
        let listing = Listing::new(data);
        assert!(listing.children().is_empty());
        assert!(listing.into_children().is_empty());
    }
}
