// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS transport for the Reddit API.
//!
//! The [`Transport`] trait is the seam between the client and the network.
//! [`Session`] is the production implementation: it obtains and refreshes
//! OAuth tokens, honors Reddit's rate-limit headers, and turns HTTP failures
//! into typed [`HTTPError`]s. Tests substitute a deterministic transport.

pub mod auth;
pub mod ratelimit;
pub mod session;

pub use reqwest::Method;
pub use session::Session;

use reqwest::{StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// A single request to the Reddit API.
///
/// Requests are assembled by the client from normalized parameters; a
/// transport only has to put them on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the API endpoint, such as `/api/info/`.
    pub path: String,

    /// Query string parameters.
    pub params: Vec<(String, String)>,

    /// Form-encoded request body.
    pub form: Option<Vec<(String, String)>>,

    /// JSON request body. Never set together with `form`.
    pub json: Option<Value>,

    /// Files to upload as a multipart body, alongside any `form` fields.
    pub files: Vec<FilePart>,

    /// Timeout for the request.
    pub timeout: Duration,
}

impl ApiRequest {
    /// Creates a request with no parameters or body.
    pub fn new(method: Method, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            form: None,
            json: None,
            files: Vec::new(),
            timeout,
        }
    }

    /// Value of the query parameter `name`, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A file uploaded as part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Name of the form field.
    pub field: String,

    /// File name reported to the server.
    pub file_name: String,

    /// MIME type of the contents, if known.
    pub mime_type: Option<String>,

    /// The file's contents.
    pub contents: Vec<u8>,
}

impl FilePart {
    /// Creates a new file part for the form field `field`.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime_type: None,
            contents,
        }
    }

    /// Sets the MIME type of the file.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Carries requests to the Reddit API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the decoded JSON response body.
    ///
    /// Empty responses decode to [`Value::Null`]. A 400 response must be
    /// reported as [`HTTPError::BadRequest`] carrying the raw body, and a
    /// redirect as [`HTTPError::Redirect`].
    fn request(&self, request: &ApiRequest) -> impl Future<Output = HTTPResult<Value>> + Send;
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the request as malformed.
    #[error("Bad request: {body}")]
    BadRequest {
        /// The raw response body.
        body: String,
    },

    /// The server redirected the request.
    #[error("Redirected to {path}")]
    Redirect {
        /// Path of the redirect target.
        path: String,
    },

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the transport.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// A response body that is not valid JSON.
    #[error("Error decoding response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Reddit refused to grant an access token.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Authorized access was requested from a session that only has
    /// read-only credentials.
    #[error("No credentials for authorized access")]
    ReadOnly,
}
