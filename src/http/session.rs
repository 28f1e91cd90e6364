// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authenticated HTTPS sessions with the Reddit API.

use crate::clock::SystemClock;
use crate::config::Config;
use crate::http::auth::{Authorizer, Token};
use crate::http::ratelimit::RateLimiter;
use crate::http::{ApiRequest, HTTPError, HTTPResult, Transport};
use log::{debug, trace};
use reqwest::multipart;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode, Url, header};
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::{self, Instant};

/// A transport that contacts the Reddit API directly.
///
/// A session authorizes itself lazily: the first request obtains an access
/// token, which is reused until it expires or Reddit rejects it.
///
/// Sessions with user credentials can temporarily drop to read-only access
/// with [`Session::set_read_only()`].
#[derive(Debug)]
pub struct Session {
    client: Client,
    authorizer: Authorizer,
    read_only_authorizer: Authorizer,
    read_only: AtomicBool,
    oauth_url: String,
    token: tokio::sync::Mutex<Option<Token>>,
    rate_limiter: Mutex<RateLimiter>,
    clock: SystemClock,
}

impl Session {
    /// Creates a new session for the application described by `config`.
    ///
    /// Returns an error if the HTTP client cannot be created, which only
    /// happens if a TLS backend or DNS resolution cannot be initialized.
    pub fn new(config: &Config) -> HTTPResult<Self> {
        let client = ClientBuilder::new()
            .user_agent(Self::user_agent(config))
            .redirect(Policy::none())
            .build()?;
        let authorizer = Authorizer::from_config(config);
        let read_only = AtomicBool::new(authorizer.grant().is_read_only());
        Ok(Self {
            client,
            authorizer,
            read_only_authorizer: Authorizer::read_only(config),
            read_only,
            oauth_url: config.oauth_url().to_string(),
            token: tokio::sync::Mutex::new(None),
            rate_limiter: Mutex::new(RateLimiter::default()),
            clock: SystemClock,
        })
    }

    /// True if the session only has read-only access.
    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Switches between read-only and authorized access.
    ///
    /// The cached token is discarded whenever the mode changes. Returns
    /// [`HTTPError::ReadOnly`] if authorized access is requested but the
    /// session was configured without user credentials.
    pub async fn set_read_only(&self, read_only: bool) -> HTTPResult<()> {
        if !read_only && self.authorizer.grant().is_read_only() {
            return Err(HTTPError::ReadOnly);
        }
        let mut token = self.token.lock().await;
        if self.read_only.swap(read_only, Ordering::SeqCst) != read_only {
            debug!("Switching session to {} access", if read_only { "read-only" } else { "authorized" });
            *token = None;
        }
        Ok(())
    }

    fn authorizer(&self) -> &Authorizer {
        if self.is_read_only() {
            &self.read_only_authorizer
        } else {
            &self.authorizer
        }
    }

    /// User agent sent with every request: the application's own user
    /// agent followed by this library's name and version.
    fn user_agent(config: &Config) -> String {
        format!(
            "{} {}/{}",
            config.user_agent(),
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.oauth_url)
        } else {
            format!("{}/{path}", self.oauth_url)
        }
    }

    async fn access_token(&self) -> HTTPResult<String> {
        let mut token = self.token.lock().await;
        match token.as_ref() {
            Some(current) if current.is_valid(&self.clock) => Ok(current.access_token().to_string()),
            _ => {
                let fresh = self.authorizer().authorize(&self.client, &self.clock).await?;
                let access_token = fresh.access_token().to_string();
                *token = Some(fresh);
                Ok(access_token)
            }
        }
    }

    async fn wait_for_rate_limit(&self) {
        let delay = self
            .rate_limiter
            .lock()
            .map(|limiter| limiter.delay(Instant::now()))
            .unwrap_or_default();
        if let Some(delay) = delay {
            debug!("Rate limit budget exhausted, waiting {:.2} seconds", delay.as_secs_f64());
            time::sleep(delay).await;
        }
    }

    fn build(&self, request: &ApiRequest, access_token: &str) -> HTTPResult<RequestBuilder> {
        let builder = self
            .client
            .request(request.method.clone(), self.url(&request.path))
            .bearer_auth(access_token)
            .query(&request.params)
            .timeout(request.timeout);

        let builder = if !request.files.is_empty() {
            builder.multipart(Self::multipart(request)?)
        } else if let Some(json) = &request.json {
            builder.json(json)
        } else if let Some(form) = &request.form {
            builder.form(form)
        } else {
            builder
        };
        Ok(builder)
    }

    fn multipart(request: &ApiRequest) -> HTTPResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in request.form.iter().flatten() {
            form = form.text(name.clone(), value.clone());
        }
        for file in &request.files {
            let mut part =
                multipart::Part::bytes(file.contents.clone()).file_name(file.file_name.clone());
            if let Some(mime_type) = &file.mime_type {
                part = part.mime_str(mime_type)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }

    async fn handle(&self, response: Response) -> HTTPResult<Value> {
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|value| value.to_str())
                .transpose()?
                .unwrap_or_default();
            return Err(HTTPError::Redirect {
                path: redirect_path(location),
            });
        }

        match status {
            StatusCode::NO_CONTENT => Ok(Value::Null),
            StatusCode::BAD_REQUEST => Err(HTTPError::BadRequest {
                body: response.text().await?,
            }),
            StatusCode::UNAUTHORIZED => {
                // Force a new token on the next request.
                *self.token.lock().await = None;
                Err(HTTPError::Http(status))
            }
            status if status.is_success() => Self::decode(response).await,
            status => Err(HTTPError::Http(status)),
        }
    }

    async fn decode(response: Response) -> HTTPResult<Value> {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().map(String::from))
            .transpose()?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let content_type = content_type.ok_or(HTTPError::MissingContentType)?;
        if !content_type.starts_with("application/json") {
            Err(HTTPError::UnexpectedContentType(content_type))
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }
}

impl Transport for Session {
    async fn request(&self, request: &ApiRequest) -> HTTPResult<Value> {
        self.wait_for_rate_limit().await;
        let access_token = self.access_token().await?;

        trace!("{} {} {:?}", request.method, request.path, request.params);
        let response = self.build(request, &access_token)?.send().await?;

        if let Ok(mut limiter) = self.rate_limiter.lock() {
            limiter.update(response.headers(), Instant::now());
        }

        self.handle(response).await
    }
}

/// The path of a redirect target. Relative targets are kept as they are.
fn redirect_path(location: &str) -> String {
    Url::parse(location)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| location.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::{Grant, Token};
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config::builder()
            .client_id("id")
            .client_secret("secret")
            .user_agent("test:arraw:v0 (by u/nobody)")
            .oauth_url("https://oauth.example.com/")
            .build()
            .unwrap()
    }

    fn script_config() -> Config {
        Config::builder()
            .client_id("id")
            .client_secret("secret")
            .credentials("user", "hunter2")
            .user_agent("test:arraw:v0 (by u/nobody)")
            .build()
            .unwrap()
    }

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response {
        let mut builder = ::http::Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Response::from(builder.body(body).unwrap())
    }

    fn json_response(status: u16, body: &'static str) -> Response {
        response(status, &[("content-type", "application/json; charset=UTF-8")], body)
    }

    async fn cache_token(session: &Session) {
        let token = Token::new("abc", 3600, &SystemClock).unwrap();
        *session.token.lock().await = Some(token);
    }

    mod setup {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_appends_its_name_and_version_to_the_user_agent() {
            let user_agent = Session::user_agent(&config());
            let expected = format!("test:arraw:v0 (by u/nobody) arraw/{}", env!("CARGO_PKG_VERSION"));
            assert_eq!(user_agent, expected);
        }

        #[test]
        fn it_joins_paths_to_the_api_endpoint() {
            let session = Session::new(&config()).unwrap();
            assert_eq!(session.url("/api/info/"), "https://oauth.example.com/api/info/");
            assert_eq!(session.url("api/info/"), "https://oauth.example.com/api/info/");
        }
    }

    mod read_only {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_is_read_only_without_user_credentials() {
            let session = Session::new(&config()).unwrap();
            assert!(session.is_read_only());
        }

        #[test]
        fn it_is_authorized_with_user_credentials() {
            let session = Session::new(&script_config()).unwrap();
            assert!(!session.is_read_only());
        }

        #[tokio::test]
        async fn it_switches_to_read_only_access_and_back() {
            let session = Session::new(&script_config()).unwrap();

            session.set_read_only(true).await.unwrap();
            assert!(session.is_read_only());
            assert_eq!(session.authorizer().grant(), &Grant::ClientCredentials);

            session.set_read_only(false).await.unwrap();
            assert!(!session.is_read_only());
            assert!(!session.authorizer().grant().is_read_only());
        }

        #[tokio::test]
        async fn it_discards_the_cached_token_when_switching() {
            let session = Session::new(&script_config()).unwrap();
            cache_token(&session).await;
            session.set_read_only(true).await.unwrap();
            assert!(session.token.lock().await.is_none());
        }

        #[tokio::test]
        async fn it_keeps_the_cached_token_when_the_mode_does_not_change() {
            let session = Session::new(&script_config()).unwrap();
            cache_token(&session).await;
            session.set_read_only(false).await.unwrap();
            assert!(session.token.lock().await.is_some());
        }

        #[tokio::test]
        async fn it_refuses_authorized_access_without_user_credentials() {
            let session = Session::new(&config()).unwrap();
            let err = session.set_read_only(false).await.unwrap_err();
            assert!(matches!(err, HTTPError::ReadOnly));
            assert!(session.is_read_only());
        }
    }

    mod handle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn it_decodes_json_bodies() {
            let session = Session::new(&config()).unwrap();
            let value = session.handle(json_response(200, r#"{"kind": "t2"}"#)).await.unwrap();
            assert_eq!(value, serde_json::json!({"kind": "t2"}));
        }

        #[tokio::test]
        async fn it_returns_redirect_paths() {
            let session = Session::new(&config()).unwrap();
            let response = response(302, &[("location", "https://www.reddit.com/r/cats/?utm=1")], "");
            let err = session.handle(response).await.unwrap_err();
            assert!(matches!(err, HTTPError::Redirect { path } if path == "/r/cats/"));
        }

        #[tokio::test]
        async fn it_keeps_the_body_of_bad_requests() {
            let session = Session::new(&config()).unwrap();
            let body = r#"{"reason": "BAD_SR_NAME", "explanation": "that name is taken"}"#;
            let err = session.handle(json_response(400, body)).await.unwrap_err();
            assert!(matches!(err, HTTPError::BadRequest { body: returned } if returned == body));
        }

        #[tokio::test]
        async fn it_returns_null_for_no_content() {
            let session = Session::new(&config()).unwrap();
            let value = session.handle(response(204, &[], "")).await.unwrap();
            assert_eq!(value, Value::Null);
        }

        #[tokio::test]
        async fn it_returns_null_for_empty_bodies() {
            let session = Session::new(&config()).unwrap();
            let value = session.handle(json_response(200, "")).await.unwrap();
            assert_eq!(value, Value::Null);
        }

        #[tokio::test]
        async fn it_rejects_non_json_content() {
            let session = Session::new(&config()).unwrap();
            let response = response(200, &[("content-type", "text/html")], "<html></html>");
            let err = session.handle(response).await.unwrap_err();
            assert!(matches!(err, HTTPError::UnexpectedContentType(content_type) if content_type == "text/html"));
        }

        #[tokio::test]
        async fn it_rejects_bodies_without_a_content_type() {
            let session = Session::new(&config()).unwrap();
            let err = session.handle(response(200, &[], "{}")).await.unwrap_err();
            assert!(matches!(err, HTTPError::MissingContentType));
        }

        #[tokio::test]
        async fn it_forgets_its_token_when_unauthorized() {
            let session = Session::new(&config()).unwrap();
            cache_token(&session).await;
            let err = session.handle(json_response(401, "{}")).await.unwrap_err();
            assert!(matches!(err, HTTPError::Http(StatusCode::UNAUTHORIZED)));
            assert!(session.token.lock().await.is_none());
        }

        #[tokio::test]
        async fn it_returns_other_failures_as_status_errors() {
            let session = Session::new(&config()).unwrap();
            let err = session.handle(json_response(503, "{}")).await.unwrap_err();
            assert!(matches!(err, HTTPError::Http(StatusCode::SERVICE_UNAVAILABLE)));
        }
    }

    mod redirect_path {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_extracts_paths_from_absolute_redirects() {
            let path = redirect_path("https://www.reddit.com/r/AskReddit/?utm=1");
            assert_eq!(path, "/r/AskReddit/");
        }

        #[test]
        fn it_keeps_relative_redirects() {
            assert_eq!(redirect_path("/r/pics/"), "/r/pics/");
        }

        #[test]
        fn it_handles_redirects_to_a_bare_host() {
            assert_eq!(redirect_path("https://www.reddit.com"), "/");
        }
    }
}
