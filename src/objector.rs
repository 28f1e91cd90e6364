// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Turns raw JSON responses into typed objects.
//!
//! Reddit wraps every object it returns in an envelope such as
//! `{"kind": "t3", "data": {...}}`. The [`Objector`] looks up the envelope's
//! kind in a [`KindRegistry`] and hands the envelope's attributes, with any
//! nested envelopes already converted, to the registered constructor.
//! Anything that is not an envelope passes through unchanged.

use crate::config::{ConfigError, Kinds};
use crate::error::{ApiErrorItem, ApiException, Error};
use crate::models::widget::WIDGET_KINDS;
use crate::models::{
    Comment, Listing, Message, MoreComments, Multireddit, Redditor, Submission, Subreddit, Thing,
    ThingData, Trophy, TrophyList, Widget,
};
use log::trace;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// The result of objectifying a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// A single domain object.
    Thing(Thing),

    /// An ordered sequence of objects.
    List(Vec<Object>),

    /// JSON that did not describe a domain object, passed through unchanged.
    Raw(Value),
}

impl Object {
    /// The object as a thing, if it is one.
    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Object::Thing(thing) => Some(thing),
            _ => None,
        }
    }

    /// Converts the object into a thing, if it is one.
    pub fn into_thing(self) -> Option<Thing> {
        match self {
            Object::Thing(thing) => Some(thing),
            _ => None,
        }
    }

    /// The object as a list of objects, if it is one.
    pub fn as_list(&self) -> Option<&[Object]> {
        match self {
            Object::List(items) => Some(items),
            _ => None,
        }
    }

    /// The object as raw JSON, if it was passed through.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Object::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the object into a list of things.
    ///
    /// A single thing becomes a list of one; elements of a list that are not
    /// things are dropped, and raw JSON yields nothing.
    pub fn into_things(self) -> Vec<Thing> {
        match self {
            Object::Thing(thing) => vec![thing],
            Object::List(items) => items.into_iter().filter_map(Object::into_thing).collect(),
            Object::Raw(_) => Vec::new(),
        }
    }
}

/// Builds a domain object from an envelope's resolved attributes.
pub type Constructor = fn(ThingData) -> Result<Thing, Error>;

/// Maps kind tags to the constructors of their domain objects.
///
/// A registry is immutable once built; it is shared by every
/// objectification a client performs.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    constructors: HashMap<String, Constructor>,
}

impl KindRegistry {
    /// Starts a registry preloaded with every built-in kind, using the tags
    /// in `kinds` for the configurable ones.
    ///
    /// Returns an error if the tags in `kinds` are empty or not distinct.
    pub fn builder(kinds: &Kinds) -> Result<KindRegistryBuilder, ConfigError> {
        kinds.validate()?;
        Ok(KindRegistryBuilder::with_kinds(kinds))
    }

    /// Creates a registry of the built-in kinds, using the tags in `kinds`
    /// for the configurable ones.
    pub fn from_kinds(kinds: &Kinds) -> Result<Self, ConfigError> {
        Ok(Self::builder(kinds)?.build())
    }

    /// Constructor registered for `kind`.
    pub fn get(&self, kind: &str) -> Option<Constructor> {
        self.constructors.get(kind).copied()
    }

    /// True if a constructor is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        KindRegistryBuilder::with_kinds(&Kinds::default()).build()
    }
}

/// Collects constructors for a [`KindRegistry`].
#[derive(Debug, Clone, Default)]
pub struct KindRegistryBuilder {
    constructors: HashMap<String, Constructor>,
}

impl KindRegistryBuilder {
    /// Creates an empty builder, without any of the built-in kinds.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_kinds(kinds: &Kinds) -> Self {
        let mut builder = Self::new()
            .register(&kinds.comment, |data| Ok(Thing::Comment(Comment::new(data))))
            .register(&kinds.message, |data| Ok(Thing::Message(Message::new(data))))
            .register(&kinds.redditor, |data| Ok(Thing::Redditor(Redditor::new(data))))
            .register(&kinds.submission, |data| Ok(Thing::Submission(Submission::new(data))))
            .register(&kinds.subreddit, |data| Ok(Thing::Subreddit(Subreddit::new(data))))
            .register(&kinds.trophy, |data| Ok(Thing::Trophy(Trophy::new(data))))
            .register("Listing", |data| Ok(Thing::Listing(Listing::new(data))))
            .register("more", |data| Ok(Thing::MoreComments(MoreComments::new(data))))
            .register("TrophyList", |data| Ok(Thing::TrophyList(TrophyList::new(data))))
            .register("LabeledMulti", |data| Ok(Thing::Multireddit(Multireddit::new(data))));
        for kind in WIDGET_KINDS {
            builder = builder.register(*kind, |data| Ok(Thing::Widget(Widget::new(data))));
        }
        builder
    }

    /// Registers `constructor` for `kind`, replacing any previous one.
    pub fn register(mut self, kind: impl Into<String>, constructor: Constructor) -> Self {
        self.constructors.insert(kind.into(), constructor);
        self
    }

    /// Creates the registry.
    pub fn build(self) -> KindRegistry {
        KindRegistry {
            constructors: self.constructors,
        }
    }
}

/// Converts JSON responses into domain objects.
#[derive(Debug, Clone, Default)]
pub struct Objector {
    registry: Arc<KindRegistry>,
}

impl Objector {
    /// Creates an objector that looks up kinds in `registry`.
    pub fn new(registry: Arc<KindRegistry>) -> Self {
        Self { registry }
    }

    /// The registry used to look up kinds.
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Converts `value` into domain objects.
    ///
    /// Lists are converted element by element. A `{"json": {"errors": [...]}}`
    /// wrapper with errors becomes [`Error::Api`], a
    /// `{"json": {"data": {"things": [...]}}}` wrapper yields its things, and
    /// any other `{"json": {"data": ...}}` wrapper yields its data.
    /// Envelopes of unregistered kinds fail with [`Error::UnrecognizedKind`].
    pub fn objectify(&self, value: Value) -> Result<Object, Error> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.objectify(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::List),
            Value::Object(map) => self.objectify_map(map),
            other => Ok(Object::Raw(other)),
        }
    }

    fn objectify_map(&self, map: Map<String, Value>) -> Result<Object, Error> {
        if let Some(json) = map.get("json").and_then(Value::as_object) {
            if let Some(errors) = json.get("errors").and_then(Value::as_array) {
                if !errors.is_empty() {
                    return Err(Error::Api(api_exception(errors)));
                }
            }
            if let Some(data) = json.get("data") {
                return match data.get("things") {
                    Some(things) => self.objectify(things.clone()),
                    None => self.objectify(data.clone()),
                };
            }
        }

        match Envelope::detect(&map) {
            Some(envelope) => self.objectify_envelope(envelope, map).map(Object::Thing),
            None => Ok(Object::Raw(Value::Object(map))),
        }
    }

    fn objectify_envelope(&self, envelope: Envelope, mut map: Map<String, Value>) -> Result<Thing, Error> {
        let constructor = self
            .registry
            .get(&envelope.kind)
            .ok_or_else(|| Error::UnrecognizedKind(envelope.kind.clone()))?;
        trace!("Objectifying {}", envelope.kind);

        let attributes = if envelope.wrapped {
            match map.remove("data") {
                Some(Value::Object(data)) => data,
                _ => Map::new(),
            }
        } else {
            map
        };

        let data = attributes
            .into_iter()
            .map(|(key, value)| self.resolve(value).map(|object| (key, object)))
            .collect::<Result<ThingData, Error>>()?;
        constructor(data)
    }

    /// Converts the envelopes nested in an attribute value.
    fn resolve(&self, value: Value) -> Result<Object, Error> {
        match value {
            Value::Object(map) => match Envelope::detect(&map) {
                Some(envelope) => self.objectify_envelope(envelope, map).map(Object::Thing),
                None => Ok(Object::Raw(Value::Object(map))),
            },
            Value::Array(items) if items.iter().any(is_envelope) => items
                .into_iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::List),
            other => Ok(Object::Raw(other)),
        }
    }
}

/// The kind of an object wrapped in an envelope.
struct Envelope {
    kind: String,

    /// True for `{kind, data}` envelopes, false for widget-style objects
    /// whose attributes sit next to their kind.
    wrapped: bool,
}

impl Envelope {
    fn detect(map: &Map<String, Value>) -> Option<Self> {
        let kind = map.get("kind")?.as_str()?;
        let wrapped = map.get("data").is_some_and(Value::is_object);
        let widget = map.contains_key("shortName") || kind == "menu" || kind == "moderators";
        if wrapped || widget {
            Some(Self {
                kind: kind.to_string(),
                wrapped,
            })
        } else {
            None
        }
    }
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().and_then(Envelope::detect).is_some()
}

/// Builds an exception from `[error_type, message, field]` triples.
fn api_exception(errors: &[Value]) -> ApiException {
    let items = errors
        .iter()
        .map(|error| {
            let part = |index: usize| error.get(index).and_then(Value::as_str);
            ApiErrorItem::new(
                part(0).unwrap_or_default(),
                part(1).unwrap_or_default(),
                part(2).filter(|field| !field.is_empty()),
            )
        })
        .collect();
    ApiException::new(items)
}
