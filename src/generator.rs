// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Lazy iteration over paginated Reddit listings.
//!
//! Reddit returns listings a page at a time; each page carries an `after`
//! cursor pointing at the next one. A [`ListingGenerator`] requests pages
//! only as they are needed and yields their things one by one.

use crate::error::Error;
use crate::http::Transport;
use crate::models::{Listing, Thing};
use crate::objector::Object;
use crate::params::Params;
use crate::reddit::Reddit;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use log::{debug, warn};
use serde_json::Value;
use std::collections::VecDeque;

/// Number of items a generator yields unless told otherwise.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page Reddit will return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Largest number of fullnames looked up by a single `info` request.
pub const INFO_BATCH_SIZE: usize = 100;

/// Path of the endpoint that looks up things by fullname or URL.
pub const INFO_PATH: &str = "/api/info/";

/// Yields the things in a listing, fetching pages as they are needed.
///
/// A generator is forward-only and cannot be restarted. It stops when Reddit
/// returns an empty page or no cursor to the next page, when Reddit returns
/// the same cursor twice, or when it has yielded its limit of items.
#[derive(Debug)]
pub struct ListingGenerator<'a, T: Transport> {
    reddit: &'a Reddit<T>,
    path: String,
    params: Params,
    limit: Option<usize>,
    yielded: usize,
    batch: VecDeque<Thing>,
    after: Option<String>,
    exhausted: bool,
}

impl<'a, T: Transport> ListingGenerator<'a, T> {
    /// Creates a generator for the listing at `path`, requested with the
    /// query parameters `params`.
    ///
    /// The generator yields at most [`DEFAULT_LIMIT`] items; use
    /// [`limit()`](Self::limit) to change that.
    pub fn new(reddit: &'a Reddit<T>, path: impl Into<String>, params: Params) -> Self {
        Self {
            reddit,
            path: path.into(),
            params,
            limit: Some(DEFAULT_LIMIT),
            yielded: 0,
            batch: VecDeque::new(),
            after: None,
            exhausted: false,
        }
    }

    /// Sets the maximum number of items to yield. `None` yields every item
    /// in the listing.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of items yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Returns the next item in the listing, or `None` once the listing is
    /// exhausted.
    ///
    /// An error ends the listing.
    pub async fn next(&mut self) -> Option<Result<Thing, Error>> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }

        if self.batch.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.next_batch().await {
                self.exhausted = true;
                return Some(Err(err));
            }
        }

        let thing = self.batch.pop_front()?;
        self.yielded += 1;
        Some(Ok(thing))
    }

    /// Converts the generator into a stream of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<Thing, Error>> + 'a {
        stream::unfold(self, |mut generator| async move {
            let item = generator.next().await?;
            Some((item, generator))
        })
    }

    fn page_size(&self) -> usize {
        match self.limit {
            Some(limit) => limit.saturating_sub(self.yielded).min(MAX_PAGE_SIZE),
            None => MAX_PAGE_SIZE,
        }
    }

    async fn next_batch(&mut self) -> Result<(), Error> {
        let mut params = self.params.clone();
        params.insert(String::from("limit"), Value::from(self.page_size()));
        if let Some(after) = &self.after {
            params.insert(String::from("after"), Value::from(after.as_str()));
        }

        let listing = into_listing(self.reddit.get(&self.path, params).await?)?;
        let after = listing.after().map(String::from);
        self.batch.extend(listing.into_children());

        if self.batch.is_empty() {
            self.exhausted = true;
            return Ok(());
        }

        match after {
            Some(after) if self.after.as_deref() == Some(after.as_str()) => {
                warn!("{} returned the cursor {after} twice, ending the listing", self.path);
                self.exhausted = true;
            }
            Some(after) => self.after = Some(after),
            None => self.exhausted = true,
        }
        Ok(())
    }
}

/// Finds the listing in a page response.
///
/// Comment pages are a pair of listings, the submission and its comments;
/// the second one holds the items.
fn into_listing(object: Object) -> Result<Listing, Error> {
    let thing = match object {
        Object::List(items) => {
            let index = if items.len() > 1 { 1 } else { 0 };
            items.into_iter().nth(index).and_then(Object::into_thing)
        }
        other => other.into_thing(),
    };
    match thing {
        Some(Thing::Listing(listing)) => Ok(listing),
        other => Err(Error::UnexpectedResponse(format!(
            "expected a listing, got {other:?}"
        ))),
    }
}

/// Splits an `info` lookup into the query parameters of each request.
///
/// Exactly one of `fullnames` or `url` must be given.
pub(crate) fn info_batches(
    fullnames: Option<Vec<String>>,
    url: Option<&str>,
) -> Result<Vec<Params>, Error> {
    match (fullnames, url) {
        (Some(_), Some(_)) => Err(Error::InvalidArgument(String::from(
            "Mutually exclusive parameters: `fullnames`, `url`",
        ))),
        (None, None) => Err(Error::InvalidArgument(String::from(
            "Either `fullnames` or `url` must be provided",
        ))),
        (Some(fullnames), None) => Ok(fullnames
            .chunks(INFO_BATCH_SIZE)
            .map(|chunk| single_param("id", chunk.join(",")))
            .collect()),
        (None, Some(url)) => Ok(vec![single_param("url", url)]),
    }
}

/// Looks up each batch of `info` parameters in turn, yielding the things
/// found in the order Reddit returns them.
pub(crate) fn info<'a, T: Transport>(
    reddit: &'a Reddit<T>,
    batches: Vec<Params>,
) -> impl Stream<Item = Result<Thing, Error>> + 'a {
    debug!("Looking up info in {} batches", batches.len());
    stream::iter(batches)
        .then(move |params| reddit.get(INFO_PATH, params))
        .map_ok(|object| stream::iter(into_found(object).into_iter().map(Ok::<_, Error>)))
        .try_flatten()
}

fn into_found(object: Object) -> Vec<Thing> {
    match object {
        Object::Thing(Thing::Listing(listing)) => listing.into_children(),
        other => other.into_things(),
    }
}

fn single_param(name: &str, value: impl Into<String>) -> Params {
    let mut params = Params::new();
    params.insert(String::from(name), Value::String(value.into()));
    params
}
