// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Trophies shown on user profiles.

use crate::models::{Thing, ThingData};

/// An award displayed on a user's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Trophy {
    data: ThingData,
}

impl Trophy {
    /// Creates a trophy from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the trophy's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The trophy's name, such as "Verified Email".
    pub fn name(&self) -> &str {
        self.data.str("name").unwrap_or_default()
    }

    /// The trophy's description, if it has one.
    pub fn description(&self) -> Option<&str> {
        self.data.str("description")
    }

    /// URL of the trophy's 70x70 icon.
    pub fn icon_70(&self) -> &str {
        self.data.str("icon_70").unwrap_or_default()
    }
}

/// The trophies awarded to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct TrophyList {
    data: ThingData,
}

impl TrophyList {
    /// Creates a trophy list from its attributes.
    pub fn new(data: ThingData) -> Self {
        Self { data }
    }

    /// All of the list's attributes.
    pub fn data(&self) -> &ThingData {
        &self.data
    }

    /// The trophies in the list.
    pub fn trophies(&self) -> Vec<&Trophy> {
        self.data
            .things("trophies")
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Trophy(trophy) => Some(trophy),
                _ => None,
            })
            .collect()
    }
}
