// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Errors returned by the client.

use crate::config::ConfigError;
use crate::http::HTTPError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// A method was called with invalid or mutually exclusive arguments.
    ///
    /// These errors are raised before any request is sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The client configuration is incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reddit rejected the request with one or more structured errors.
    #[error("API error: {0}")]
    Api(#[from] ApiException),

    /// An error from the underlying HTTP transport.
    #[error("HTTP error: {0}")]
    Http(#[from] HTTPError),

    /// A response contained an object whose kind is not in the kind registry.
    #[error("Unrecognized kind {0:?}")]
    UnrecognizedKind(String),

    /// Reddit returned a bad request response whose body could not be
    /// understood as a structured error.
    #[error("Unexpected bad request without a structured JSON body: {0}")]
    UnexpectedBadRequest(String),

    /// A response did not have the shape the calling method expects.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// A single structured error returned by the Reddit API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorItem {
    /// Machine-readable error type, such as `RATELIMIT` or `NO_TEXT`.
    pub error_type: String,

    /// Human-readable explanation of the error.
    pub message: String,

    /// Name of the request field that caused the error, if any.
    pub field: Option<String>,
}

impl ApiErrorItem {
    /// Creates a new error item.
    pub fn new(
        error_type: impl Into<String>,
        message: impl Into<String>,
        field: Option<impl Into<String>>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            field: field.map(Into::into),
        }
    }
}

impl fmt::Display for ApiErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " on field {field:?}")?;
        }
        Ok(())
    }
}

/// One or more structured errors returned by the Reddit API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiException {
    items: Vec<ApiErrorItem>,
}

impl ApiException {
    /// Wraps the given error items.
    pub fn new(items: Vec<ApiErrorItem>) -> Self {
        Self { items }
    }

    /// The individual errors, in the order Reddit reported them.
    pub fn items(&self) -> &[ApiErrorItem] {
        &self.items
    }
}

impl fmt::Display for ApiException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.iter().join("\n"))
    }
}

impl std::error::Error for ApiException {}
