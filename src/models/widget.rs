// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Subreddit sidebar widgets.
//!
//! Widgets do not use the usual `{kind, data}` envelope: their attributes
//! sit next to the `kind` tag in a single object.

use crate::models::ThingData;

/// Kind tags of the widgets Reddit can place in a subreddit's sidebar.
pub const WIDGET_KINDS: &[&str] = &[
    "button",
    "calendar",
    "community-list",
    "custom",
    "id-card",
    "image",
    "menu",
    "moderators",
    "post-flair",
    "subreddit-rules",
    "textarea",
];

/// A subreddit sidebar widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    data: ThingData,
}

impl Widget {
    /// Creates a widget from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the widget's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The widget's kind tag, such as `textarea`.
    pub fn kind(&self) -> &str {
        self.data.str("kind").unwrap_or_default()
    }

    /// The widget's ID.
    pub fn id(&self) -> &str {
        self.data.str("id").unwrap_or_default()
    }

    /// The widget's title.
    pub fn short_name(&self) -> &str {
        self.data.str("shortName").unwrap_or_default()
    }
}
