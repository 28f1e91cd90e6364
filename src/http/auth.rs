// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! OAuth2 authorization for the Reddit API.
//!
//! Reddit requires every API request to carry a bearer token. Which OAuth
//! grant is used to obtain that token depends on the kind of application
//! and the credentials available; see [`Grant::from_config()`].

use crate::clock::{Clock, DateTime, TimeDelta, Utc};
use crate::config::Config;
use crate::http::{HTTPError, HTTPResult};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

/// Device ID sent by installed applications that do not track devices.
pub const ANONYMOUS_DEVICE_ID: &str = "DO_NOT_TRACK_THIS_DEVICE";

/// Grant type URI for installed applications.
const INSTALLED_CLIENT_GRANT: &str = "https://oauth.reddit.com/grants/installed_client";

/// Tokens are treated as expired slightly before Reddit expires them.
const EXPIRY_MARGIN_SECS: i64 = 10;

/// The OAuth grant used to obtain access tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Read-only access for confidential applications.
    ClientCredentials,

    /// Access to a script application's own account.
    Password {
        /// Account username.
        username: String,
        /// Account password.
        password: String,
    },

    /// Access delegated by a user through an earlier authorization.
    RefreshToken(String),

    /// Read-only access for installed applications without a secret.
    InstalledClient {
        /// Device identifier.
        device_id: String,
    },
}

impl Grant {
    /// Picks the grant matching the credentials in `config`.
    ///
    /// Confidential applications (with a client secret) use the password
    /// grant when a username and password are configured, the refresh token
    /// grant when a refresh token is configured, and read-only client
    /// credentials otherwise. Installed applications use a refresh token if
    /// one is configured, and an anonymous installed-client grant otherwise.
    pub fn from_config(config: &Config) -> Self {
        let refresh_token = config.refresh_token().map(String::from);

        if config.client_secret().is_some() {
            match (config.username(), config.password(), refresh_token) {
                (Some(username), Some(password), _) => Grant::Password {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                (_, _, Some(token)) => Grant::RefreshToken(token),
                _ => Grant::ClientCredentials,
            }
        } else {
            match refresh_token {
                Some(token) => Grant::RefreshToken(token),
                None => Grant::InstalledClient {
                    device_id: ANONYMOUS_DEVICE_ID.to_string(),
                },
            }
        }
    }

    /// Picks the read-only grant available to the application in `config`:
    /// client credentials for confidential applications and an anonymous
    /// installed-client grant otherwise.
    pub fn read_only(config: &Config) -> Self {
        if config.client_secret().is_some() {
            Grant::ClientCredentials
        } else {
            Grant::InstalledClient {
                device_id: ANONYMOUS_DEVICE_ID.to_string(),
            }
        }
    }

    /// True if tokens from this grant only allow read-only access.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Grant::ClientCredentials | Grant::InstalledClient { .. })
    }

    /// Form fields sent to the token endpoint.
    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            Grant::ClientCredentials => {
                vec![("grant_type", String::from("client_credentials"))]
            }
            Grant::Password { username, password } => vec![
                ("grant_type", String::from("password")),
                ("username", username.clone()),
                ("password", password.clone()),
            ],
            Grant::RefreshToken(token) => vec![
                ("grant_type", String::from("refresh_token")),
                ("refresh_token", token.clone()),
            ],
            Grant::InstalledClient { device_id } => vec![
                ("grant_type", String::from(INSTALLED_CLIENT_GRANT)),
                ("device_id", device_id.clone()),
            ],
        }
    }
}

/// An OAuth access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
    scopes: Vec<String>,
}

impl Token {
    /// Creates a token that expires `expires_in` seconds after `clock`'s
    /// current time.
    ///
    /// Returns an error if the expiry cannot be represented as a date.
    pub fn new<C: Clock>(
        access_token: impl Into<String>,
        expires_in: i64,
        clock: &C,
    ) -> HTTPResult<Self> {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|expires_in| clock.now().checked_add_signed(expires_in))
            .ok_or_else(|| HTTPError::OAuth(format!("invalid token lifetime: {expires_in}")))?;
        Ok(Self {
            access_token: access_token.into(),
            expires_at,
            scopes: Vec::new(),
        })
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Scopes granted to the token.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// True if the token can still be used at `clock`'s current time.
    pub fn is_valid<C: Clock>(&self, clock: &C) -> bool {
        clock.now() + TimeDelta::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    error: Option<String>,
}

/// Obtains access tokens for one application and grant.
#[derive(Debug, Clone)]
pub struct Authorizer {
    client_id: String,
    client_secret: Option<String>,
    token_url: String,
    grant: Grant,
}

impl Authorizer {
    /// Creates an authorizer using the credentials and endpoints in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_grant(config, Grant::from_config(config))
    }

    /// Creates an authorizer that only obtains read-only tokens.
    pub fn read_only(config: &Config) -> Self {
        Self::with_grant(config, Grant::read_only(config))
    }

    fn with_grant(config: &Config, grant: Grant) -> Self {
        Self {
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().map(String::from),
            token_url: format!("{}/api/v1/access_token", config.reddit_url()),
            grant,
        }
    }

    /// The grant used by this authorizer.
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    /// Requests a new access token from Reddit.
    pub async fn authorize<C: Clock>(&self, client: &Client, clock: &C) -> HTTPResult<Token> {
        debug!("Requesting access token from {}", self.token_url);
        let secret = self.client_secret.as_deref().unwrap_or_default();
        let response = client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(secret))
            .form(&self.grant.form())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HTTPError::Http(response.status()));
        }

        let body = response.text().await?;
        let payload: TokenResponse = serde_json::from_str(&body)?;
        Self::token_from_response(payload, clock)
    }

    fn token_from_response<C: Clock>(payload: TokenResponse, clock: &C) -> HTTPResult<Token> {
        if let Some(error) = payload.error {
            return Err(HTTPError::OAuth(error));
        }
        let access_token = payload
            .access_token
            .ok_or_else(|| HTTPError::OAuth(String::from("response had no access token")))?;
        let mut token = Token::new(access_token, payload.expires_in.unwrap_or_default(), clock)?;
        token.scopes = payload
            .scope
            .map(|scope| scope.split_whitespace().map(String::from).collect())
            .unwrap_or_default();
        Ok(token)
    }
}
