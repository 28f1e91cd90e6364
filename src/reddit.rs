// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! The Reddit API client.
//!
//! [`Reddit`] is the entry point for everything the library does. It
//! normalizes request parameters, sends requests through a [`Transport`],
//! turns Reddit's structured error responses into [`ApiException`]s, and
//! converts responses into domain objects using its [`Objector`].

use crate::backoff::BackoffPolicy;
use crate::config::Config;
use crate::error::{ApiErrorItem, ApiException, Error};
use crate::generator::{self, ListingGenerator};
use crate::http::{ApiRequest, FilePart, HTTPError, Method, Session, Transport};
use crate::models::{Comment, Redditor, Submission, Subreddit, Thing};
use crate::objector::{KindRegistry, Object, Objector};
use crate::params::{Params, normalize_form, normalize_query};
use futures::{Stream, TryStreamExt};
use log::debug;
use serde_json::Value;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time;

/// Optional parts of a request: query parameters, a form or JSON body, and
/// files to upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    params: Params,
    data: Option<Params>,
    json: Option<Value>,
    files: Vec<FilePart>,
}

impl RequestOptions {
    /// Creates options for a request without parameters or a body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the query parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds the query parameter `name`.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the form body.
    pub fn data(mut self, data: Params) -> Self {
        self.data = Some(data);
        self
    }

    /// Adds the form field `name`.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the JSON body. A request cannot have both a JSON body and a
    /// non-empty form body.
    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Attaches a file, sending the request as a multipart form.
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }
}

/// Whether a request is being sent for the first time or retried after a
/// rate-limit error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retrying,
}

/// A client for the Reddit API.
///
/// The client is generic over its [`Transport`] so tests can substitute a
/// deterministic one; by default it talks to Reddit through a [`Session`].
#[derive(Debug)]
pub struct Reddit<T: Transport = Session> {
    config: Config,
    transport: T,
    objector: Objector,
    backoff: BackoffPolicy,
    unique_counter: AtomicU64,
}

impl Reddit<Session> {
    /// Creates a client that contacts Reddit using the application
    /// credentials in `config`.
    pub fn new(config: Config) -> Result<Self, Error> {
        let session = Session::new(&config)?;
        Self::with_transport(config, session)
    }

    /// Creates a client configured from `REDDIT_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(Config::from_env()?)
    }
}

impl<T: Transport> Reddit<T> {
    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(config: Config, transport: T) -> Result<Self, Error> {
        let registry = KindRegistry::from_kinds(config.kinds())?;
        Ok(Self::with_registry(config, transport, registry))
    }

    /// Creates a client that converts responses using the kinds in
    /// `registry`, which may include custom kinds.
    pub fn with_registry(config: Config, transport: T, registry: KindRegistry) -> Self {
        let backoff = BackoffPolicy::new(config.ratelimit_seconds());
        Self {
            config,
            transport,
            objector: Objector::new(Arc::new(registry)),
            backoff,
            unique_counter: AtomicU64::new(1),
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The objector used to convert responses.
    pub fn objector(&self) -> &Objector {
        &self.objector
    }

    /// Sends a request and returns the raw JSON response.
    ///
    /// Returns [`Error::InvalidArgument`] without sending anything if
    /// `options` has both a JSON body and a non-empty form body. A bad
    /// request response that describes its problem with `reason` and
    /// `explanation` becomes [`Error::Api`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let request = self.build_request(method, path, options)?;
        match self.transport.request(&request).await {
            Ok(value) => Ok(value),
            Err(HTTPError::BadRequest { body }) => Err(bad_request(body)),
            Err(err) => Err(err.into()),
        }
    }

    /// Sends a GET request to `path` and converts the response.
    pub async fn get(&self, path: &str, params: Params) -> Result<Object, Error> {
        let options = RequestOptions::new().params(params);
        self.objectify_request(Method::GET, path, &options).await
    }

    /// Sends a POST request to `path` and converts the response.
    ///
    /// Requests without a JSON body are always sent with a form body, even
    /// an empty one. If Reddit rejects the request with a short enough
    /// rate-limit error, the request is retried once after waiting out the
    /// delay.
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Object, Error> {
        let options = if options.json.is_none() && options.data.is_none() {
            options.data(Params::new())
        } else {
            options
        };

        let mut attempt = Attempt::Initial;
        loop {
            match (self.objectify_request(Method::POST, path, &options).await, attempt) {
                (Err(Error::Api(exception)), Attempt::Initial) => {
                    let Some(seconds) = self.backoff.compute_backoff(&exception) else {
                        return Err(Error::Api(exception));
                    };
                    debug!("Rate limit hit, sleeping for {seconds:.2} seconds");
                    time::sleep(Duration::from_secs_f64(seconds)).await;
                    attempt = Attempt::Retrying;
                }
                (result, _) => return result,
            }
        }
    }

    /// Sends a PUT request to `path` and converts the response.
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Object, Error> {
        self.objectify_request(Method::PUT, path, &options).await
    }

    /// Sends a PATCH request to `path` and converts the response.
    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Object, Error> {
        self.objectify_request(Method::PATCH, path, &options).await
    }

    /// Sends a DELETE request to `path` and converts the response.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Object, Error> {
        self.objectify_request(Method::DELETE, path, &options).await
    }

    /// Looks up things by fullname, or the submissions linking to `url`.
    ///
    /// Exactly one of `fullnames` or `url` must be given; otherwise
    /// [`Error::InvalidArgument`] is returned before any request is sent.
    /// Fullnames are looked up in batches of 100, one request per batch, as
    /// the stream is consumed. Things are yielded in the order Reddit
    /// returns them, and fullnames that do not exist are skipped.
    pub fn info(
        &self,
        fullnames: Option<Vec<String>>,
        url: Option<&str>,
    ) -> Result<impl Stream<Item = Result<Thing, Error>> + '_, Error> {
        let batches = generator::info_batches(fullnames, url)?;
        Ok(generator::info(self, batches))
    }

    /// Iterates over the listing at `path`.
    pub fn listing(&self, path: impl Into<String>, params: Params) -> ListingGenerator<'_, T> {
        ListingGenerator::new(self, path, params)
    }

    /// Fetches the submission with the base36 ID `id`, along with its
    /// top-level comments.
    pub async fn submission(&self, id: &str) -> Result<Submission, Error> {
        let path = format!("/comments/{id}/");
        let mut listings = self
            .get(&path, Params::new())
            .await?
            .into_things()
            .into_iter();

        let submission = listings
            .next()
            .and_then(first_child)
            .and_then(|thing| match thing {
                Thing::Submission(submission) => Some(submission),
                _ => None,
            })
            .ok_or_else(|| Error::UnexpectedResponse(format!("No submission found at {path}")))?;

        let comments = match listings.next() {
            Some(Thing::Listing(listing)) => listing.into_children(),
            _ => Vec::new(),
        };
        Ok(submission.with_comments(comments))
    }

    /// Fetches the comment with the base36 ID `id`.
    pub async fn comment(&self, id: &str) -> Result<Comment, Error> {
        let fullname = format!("{}_{id}", self.config.kinds().comment);
        let stream = self.info(Some(vec![fullname]), None)?;
        let mut stream = pin!(stream);
        match stream.try_next().await? {
            Some(Thing::Comment(comment)) => Ok(comment),
            _ => Err(Error::UnexpectedResponse(format!("No data returned for comment {id}"))),
        }
    }

    /// Fetches the account of the user named `name`.
    pub async fn redditor(&self, name: &str) -> Result<Redditor, Error> {
        let path = format!("/user/{name}/about/");
        match self.get(&path, Params::new()).await?.into_thing() {
            Some(Thing::Redditor(redditor)) => Ok(redditor),
            other => Err(unexpected("redditor", &path, other)),
        }
    }

    /// Fetches the subreddit named `name`.
    pub async fn subreddit(&self, name: &str) -> Result<Subreddit, Error> {
        let path = format!("/r/{name}/about/");
        match self.get(&path, Params::new()).await?.into_thing() {
            Some(Thing::Subreddit(subreddit)) => Ok(subreddit),
            other => Err(unexpected("subreddit", &path, other)),
        }
    }

    /// Fetches a random subreddit, or a random NSFW subreddit if `nsfw` is
    /// true.
    ///
    /// Reddit picks the subreddit by redirecting to it.
    pub async fn random_subreddit(&self, nsfw: bool) -> Result<Subreddit, Error> {
        let path = if nsfw { "/r/randnsfw/" } else { "/r/random/" };
        let options = RequestOptions::new().param("unique", self.next_unique());
        let target = match self.request(Method::GET, path, &options).await {
            Err(Error::Http(HTTPError::Redirect { path: target })) => target,
            Err(err) => return Err(err),
            Ok(_) => {
                return Err(Error::UnexpectedResponse(format!("{path} did not redirect")));
            }
        };

        match target.split('/').nth(2).filter(|name| !name.is_empty()) {
            Some(name) => self.subreddit(name).await,
            None => Err(Error::UnexpectedResponse(format!(
                "{path} redirected to {target}, which is not a subreddit"
            ))),
        }
    }

    /// Replies to the comment, submission, or message with the fullname
    /// `fullname`.
    ///
    /// Returns the new comment, or `None` if Reddit did not return one.
    pub async fn reply(&self, fullname: &str, body: &str) -> Result<Option<Comment>, Error> {
        if crate::text::split_fullname(fullname).is_none() {
            return Err(Error::InvalidArgument(format!("{fullname:?} is not a fullname")));
        }

        let options = RequestOptions::new()
            .field("text", body)
            .field("thing_id", fullname);
        let things = self.post("/api/comment/", options).await?.into_things();
        Ok(things.into_iter().find_map(|thing| match thing {
            Thing::Comment(comment) => Some(comment),
            _ => None,
        }))
    }

    async fn objectify_request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Object, Error> {
        let value = self.request(method, path, options).await?;
        self.objector.objectify(value)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiRequest, Error> {
        let has_form = options.data.as_ref().is_some_and(|data| !data.is_empty());
        if has_form && options.json.is_some() {
            return Err(Error::InvalidArgument(String::from(
                "At most one of `data` and `json` is supported",
            )));
        }

        let mut request = ApiRequest::new(method, path, self.config.timeout());
        request.params = normalize_query(&options.params);
        request.form = options.data.as_ref().map(normalize_form);
        request.json = options.json.clone();
        request.files = options.files.clone();
        Ok(request)
    }

    fn next_unique(&self) -> u64 {
        self.unique_counter.fetch_add(1, Ordering::Relaxed)
    }
}

fn first_child(thing: Thing) -> Option<Thing> {
    match thing {
        Thing::Listing(listing) => listing.into_children().into_iter().next(),
        other => Some(other),
    }
}

fn unexpected(expected: &str, path: &str, found: Option<Thing>) -> Error {
    Error::UnexpectedResponse(format!("expected a {expected} from {path}, got {found:?}"))
}

/// Interprets the body of a bad request response.
fn bad_request(body: String) -> Error {
    let Ok(Value::Object(data)) = serde_json::from_str::<Value>(&body) else {
        return Error::UnexpectedBadRequest(body);
    };

    if data.len() == 2 && data.contains_key("error") && data.contains_key("message") {
        return Error::Http(HTTPError::BadRequest { body });
    }

    let reason = data.get("reason").and_then(Value::as_str);
    let explanation = data.get("explanation").and_then(Value::as_str);
    let (Some(reason), Some(explanation)) = (reason, explanation) else {
        return Error::UnexpectedBadRequest(body);
    };

    let field = match data.get("fields") {
        None => None,
        Some(Value::Array(fields)) if fields.len() == 1 => match fields[0].as_str() {
            Some(field) => Some(field),
            None => return Error::UnexpectedBadRequest(body),
        },
        Some(_) => return Error::UnexpectedBadRequest(body),
    };

    ApiException::new(vec![ApiErrorItem::new(reason, explanation, field)]).into()
}
