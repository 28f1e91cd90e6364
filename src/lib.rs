// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! arraw is an asynchronous client for the Reddit API.
//!
//! It takes care of the tedious parts of talking to Reddit: obtaining and
//! refreshing OAuth tokens, normalizing request parameters, honoring
//! Reddit's rate limits, and turning Reddit's JSON envelopes into typed
//! [models]. Listings are paginated lazily, and lookups of many things at
//! once are split into batches automatically.
//!
//! # Examples
//!
//! Fetch the newest submissions in a subreddit:
//!
//! ```no_run
//! use arraw::{Config, Reddit};
//! use arraw::params::Params;
//!
//! # async fn example() -> Result<(), arraw::Error> {
//! let config = Config::builder()
//!     .client_id("my-client-id")
//!     .client_secret("my-client-secret")
//!     .user_agent("linux:my-bot:v1.0 (by u/someone)")
//!     .build()?;
//! let reddit = Reddit::new(config)?;
//!
//! let mut submissions = reddit.listing("/r/rust/new/", Params::new()).limit(Some(25));
//! while let Some(submission) = submissions.next().await {
//!     println!("{:?}", submission?.fullname());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Look up several things by fullname:
//!
//! ```no_run
//! use arraw::Reddit;
//! use futures::TryStreamExt;
//!
//! # async fn example() -> Result<(), arraw::Error> {
//! let reddit = Reddit::from_env()?;
//! let fullnames = vec![String::from("t3_2gmzqe"), String::from("t1_c0s4w1c")];
//! let things: Vec<_> = reddit.info(Some(fullnames), None)?.try_collect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Setup
//!
//! To use the Reddit API you must [register an application] and note its
//! client ID and secret. Reddit also requires a descriptive [user agent].
//! These can be set on a [`ConfigBuilder`](config::ConfigBuilder) or read from
//! the environment; see the [config] module for details.
//!
//! # License
//!
//! arraw is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [register an application]: https://www.reddit.com/prefs/apps
//! [user agent]: https://github.com/reddit-archive/reddit/wiki/API

pub mod backoff;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod models;
pub mod objector;
pub mod params;
pub mod reddit;
pub mod text;

pub use config::Config;
pub use error::{ApiErrorItem, ApiException, Error};
pub use models::Thing;
pub use objector::{KindRegistry, Object, Objector};
pub use reddit::{Reddit, RequestOptions};

#[cfg(test)]
mod test_utils;
