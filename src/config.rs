// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Client configuration.
//!
//! A [`Config`] holds everything the client needs to talk to Reddit: OAuth
//! credentials, the user agent, the API endpoints, and tuning knobs for
//! timeouts and rate-limit handling. Configurations are created with a
//! [`ConfigBuilder`], optionally seeded from the environment:
//!
//! ```
//! use arraw::Config;
//! let config = Config::builder()
//!     .client_id("my-client-id")
//!     .client_secret("my-client-secret")
//!     .user_agent("linux:my-bot:v1.0 (by u/someone)")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.ratelimit_seconds(), 5);
//! ```
//!
//! # Environment
//!
//! [`Config::from_env()`] and [`ConfigBuilder::from_env()`] read the
//! following variables:
//!
//! | Variable                   | Setting              |
//! |----------------------------|----------------------|
//! | `REDDIT_CLIENT_ID`         | OAuth client ID      |
//! | `REDDIT_CLIENT_SECRET`     | OAuth client secret  |
//! | `REDDIT_USER_AGENT`        | User agent           |
//! | `REDDIT_USERNAME`          | Script app username  |
//! | `REDDIT_PASSWORD`          | Script app password  |
//! | `REDDIT_REFRESH_TOKEN`     | OAuth refresh token  |
//! | `REDDIT_REDIRECT_URI`      | OAuth redirect URI   |
//! | `REDDIT_OAUTH_URL`         | OAuth API endpoint   |
//! | `REDDIT_URL`               | Reddit site endpoint |
//! | `REDDIT_RATELIMIT_SECONDS` | Max backoff, seconds |
//! | `REDDIT_TIMEOUT`           | Timeout, seconds     |
//!
//! Values set explicitly on a builder always win over the environment.

use std::collections::HashSet;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default endpoint for authenticated API requests.
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.reddit.com";

/// Default endpoint for the Reddit site itself, used to obtain tokens.
pub const DEFAULT_REDDIT_URL: &str = "https://www.reddit.com";

/// Default maximum number of seconds the client will sleep when Reddit
/// asks it to slow down.
pub const DEFAULT_RATELIMIT_SECONDS: u64 = 5;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(16);

/// Kind tags used by Reddit to discriminate the objects it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kinds {
    /// Kind tag for comments.
    pub comment: String,
    /// Kind tag for private messages.
    pub message: String,
    /// Kind tag for user accounts.
    pub redditor: String,
    /// Kind tag for link and self posts.
    pub submission: String,
    /// Kind tag for subreddits.
    pub subreddit: String,
    /// Kind tag for trophies.
    pub trophy: String,
}

impl Default for Kinds {
    fn default() -> Self {
        Self {
            comment: String::from("t1"),
            message: String::from("t4"),
            redditor: String::from("t2"),
            submission: String::from("t3"),
            subreddit: String::from("t5"),
            trophy: String::from("t6"),
        }
    }
}

impl Kinds {
    /// Checks that every tag is non-empty and no two kinds share a tag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tags = [
            &self.comment,
            &self.message,
            &self.redditor,
            &self.submission,
            &self.subreddit,
            &self.trophy,
        ];
        let mut seen = HashSet::new();
        for tag in tags {
            if tag.is_empty() {
                return Err(ConfigError::InvalidKinds(String::from("kind tags cannot be empty")));
            }
            if !seen.insert(tag) {
                return Err(ConfigError::InvalidKinds(format!("duplicate kind tag {tag:?}")));
            }
        }
        Ok(())
    }
}

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    client_id: String,
    client_secret: Option<String>,
    user_agent: String,
    username: Option<String>,
    password: Option<String>,
    refresh_token: Option<String>,
    redirect_uri: Option<String>,
    oauth_url: String,
    reddit_url: String,
    ratelimit_seconds: u64,
    timeout: Duration,
    kinds: Kinds,
}

impl Config {
    /// Incrementally builds a new configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Builds a configuration entirely from environment variables.
    ///
    /// Returns an error if a required setting is missing or a numeric
    /// setting cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigBuilder::from_env()?.build()
    }

    /// The OAuth client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The OAuth client secret, or `None` for installed applications.
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// User agent supplied by the application.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Username of a script application's account.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Password of a script application's account.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// A refresh token obtained through an earlier authorization.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// The application's registered redirect URI.
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Base URL for API requests, without a trailing slash.
    pub fn oauth_url(&self) -> &str {
        &self.oauth_url
    }

    /// Base URL for the site, without a trailing slash.
    pub fn reddit_url(&self) -> &str {
        &self.reddit_url
    }

    /// The longest rate-limit delay, in seconds, the client will wait out
    /// before retrying a request instead of returning the error.
    pub fn ratelimit_seconds(&self) -> u64 {
        self.ratelimit_seconds
    }

    /// Timeout for a single HTTP request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Kind tags used to build the kind registry.
    pub fn kinds(&self) -> &Kinds {
        &self.kinds
    }
}

/// Builds a [`Config`].
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
    username: Option<String>,
    password: Option<String>,
    refresh_token: Option<String>,
    redirect_uri: Option<String>,
    oauth_url: Option<String>,
    reddit_url: Option<String>,
    ratelimit_seconds: Option<u64>,
    timeout: Option<Duration>,
    kinds: Option<Kinds>,
}

impl ConfigBuilder {
    /// Creates a builder seeded with any settings found in the environment.
    ///
    /// Returns an error if a numeric setting is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: var("REDDIT_CLIENT_ID"),
            client_secret: var("REDDIT_CLIENT_SECRET"),
            user_agent: var("REDDIT_USER_AGENT"),
            username: var("REDDIT_USERNAME"),
            password: var("REDDIT_PASSWORD"),
            refresh_token: var("REDDIT_REFRESH_TOKEN"),
            redirect_uri: var("REDDIT_REDIRECT_URI"),
            oauth_url: var("REDDIT_OAUTH_URL"),
            reddit_url: var("REDDIT_URL"),
            ratelimit_seconds: parsed_var("REDDIT_RATELIMIT_SECONDS")?,
            timeout: parsed_var("REDDIT_TIMEOUT")?.map(Duration::from_secs),
            kinds: None,
        })
    }

    /// Sets the OAuth client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the OAuth client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the application's user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the username and password of a script application's account.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a refresh token.
    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the application's redirect URI.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the API endpoint.
    pub fn oauth_url(mut self, oauth_url: impl Into<String>) -> Self {
        self.oauth_url = Some(oauth_url.into());
        self
    }

    /// Sets the site endpoint.
    pub fn reddit_url(mut self, reddit_url: impl Into<String>) -> Self {
        self.reddit_url = Some(reddit_url.into());
        self
    }

    /// Sets the longest rate-limit delay that will be waited out.
    pub fn ratelimit_seconds(mut self, seconds: u64) -> Self {
        self.ratelimit_seconds = Some(seconds);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the kind tags.
    pub fn kinds(mut self, kinds: Kinds) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Validates the settings and returns the finished configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let client_id = self.client_id.ok_or(ConfigError::MissingRequired("client_id"))?;
        let user_agent = self.user_agent.ok_or(ConfigError::MissingRequired("user_agent"))?;
        let kinds = self.kinds.unwrap_or_default();
        kinds.validate()?;

        Ok(Config {
            client_id,
            client_secret: self.client_secret,
            user_agent,
            username: self.username,
            password: self.password,
            refresh_token: self.refresh_token,
            redirect_uri: self.redirect_uri,
            oauth_url: trim_url(self.oauth_url, DEFAULT_OAUTH_URL),
            reddit_url: trim_url(self.reddit_url, DEFAULT_REDDIT_URL),
            ratelimit_seconds: self.ratelimit_seconds.unwrap_or(DEFAULT_RATELIMIT_SECONDS),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            kinds,
        })
    }
}

fn trim_url(url: Option<String>, default: &str) -> String {
    url.as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parsed_var(name: &'static str) -> Result<Option<u64>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        })
        .transpose()
}

/// Indicates that a configuration could not be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error(
        "Required configuration setting {0:?} missing. It can be provided \
         to the config builder or as an environment variable."
    )]
    MissingRequired(&'static str),

    /// A setting could not be parsed.
    #[error("Invalid value {value:?} for {name}")]
    InvalidValue {
        /// Name of the environment variable.
        name: &'static str,
        /// The offending value.
        value: String,
    },

    /// The configured kind tags cannot be used to build a kind registry.
    #[error("Invalid kind tags: {0}")]
    InvalidKinds(String),
}

#[cfg(test)]
mod tests {
    mod builder {
        use super::super::*;

        fn minimal() -> ConfigBuilder {
            Config::builder().client_id("id").user_agent("test agent")
        }

        #[test]
        fn it_applies_defaults() {
            let config = minimal().build().unwrap();
            assert_eq!(config.oauth_url(), DEFAULT_OAUTH_URL);
            assert_eq!(config.reddit_url(), DEFAULT_REDDIT_URL);
            assert_eq!(config.ratelimit_seconds(), DEFAULT_RATELIMIT_SECONDS);
            assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
            assert_eq!(config.kinds(), &Kinds::default());
            assert!(config.client_secret().is_none());
        }

        #[test]
        fn it_requires_a_client_id() {
            let err = Config::builder().user_agent("agent").build().unwrap_err();
            assert_eq!(err, ConfigError::MissingRequired("client_id"));
        }

        #[test]
        fn it_requires_a_user_agent() {
            let err = Config::builder().client_id("id").build().unwrap_err();
            assert_eq!(err, ConfigError::MissingRequired("user_agent"));
        }

        #[test]
        fn it_trims_trailing_slashes_from_urls() {
            let config = minimal()
                .oauth_url("http://localhost:8080/")
                .build()
                .unwrap();
            assert_eq!(config.oauth_url(), "http://localhost:8080");
        }

        #[test]
        fn it_rejects_duplicate_kind_tags() {
            let kinds = Kinds {
                message: String::from("t1"),
                ..Kinds::default()
            };
            let err = minimal().kinds(kinds).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidKinds(_)));
        }

        #[test]
        fn it_rejects_empty_kind_tags() {
            let kinds = Kinds {
                trophy: String::new(),
                ..Kinds::default()
            };
            let err = minimal().kinds(kinds).build().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidKinds(_)));
        }
    }

    mod environment {
        use super::super::*;
        use temp_env::{with_vars, with_vars_unset};

        #[test]
        fn it_reads_settings_from_the_environment() {
            with_vars(
                [
                    ("REDDIT_CLIENT_ID", Some("env-id")),
                    ("REDDIT_CLIENT_SECRET", Some("env-secret")),
                    ("REDDIT_USER_AGENT", Some("env agent")),
                    ("REDDIT_RATELIMIT_SECONDS", Some("30")),
                    ("REDDIT_TIMEOUT", Some("5")),
                ],
                || {
                    let config = Config::from_env().unwrap();
                    assert_eq!(config.client_id(), "env-id");
                    assert_eq!(config.client_secret(), Some("env-secret"));
                    assert_eq!(config.user_agent(), "env agent");
                    assert_eq!(config.ratelimit_seconds(), 30);
                    assert_eq!(config.timeout(), Duration::from_secs(5));
                },
            )
        }

        #[test]
        fn it_prefers_explicit_settings_over_the_environment() {
            with_vars(
                [
                    ("REDDIT_CLIENT_ID", Some("env-id")),
                    ("REDDIT_USER_AGENT", Some("env agent")),
                ],
                || {
                    let config = ConfigBuilder::from_env()
                        .unwrap()
                        .client_id("explicit-id")
                        .build()
                        .unwrap();
                    assert_eq!(config.client_id(), "explicit-id");
                    assert_eq!(config.user_agent(), "env agent");
                },
            )
        }

        #[test]
        fn it_returns_an_error_if_required_settings_are_not_set() {
            with_vars_unset(["REDDIT_CLIENT_ID", "REDDIT_USER_AGENT"], || {
                let err = Config::from_env().unwrap_err();
                assert_eq!(err, ConfigError::MissingRequired("client_id"));
            })
        }

        #[test]
        fn it_returns_an_error_if_a_number_cannot_be_parsed() {
            with_vars([("REDDIT_RATELIMIT_SECONDS", Some("soon"))], || {
                let err = ConfigBuilder::from_env().unwrap_err();
                assert_eq!(
                    err,
                    ConfigError::InvalidValue {
                        name: "REDDIT_RATELIMIT_SECONDS",
                        value: String::from("soon"),
                    }
                );
            })
        }
    }
}
