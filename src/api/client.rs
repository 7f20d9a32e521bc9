use crate::api::payload::normalize_page;
use crate::model::{FetchOutcome, QueryState};
use futures::StreamExt;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default budget for a whole request (send + body read).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a response body.
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

const SUBSCRIPTIONS_PATH: &str = "api/subscriptions";
const UNSUBSCRIBE_PATH: &str = "api/unsubscribe";
const REFRESH_PATH: &str = "api/subscriptions/refresh";
const AUTH_START_PATH: &str = "api/auth/start";

/// Errors from talking to the backend.
///
/// Superseded requests are not represented here: a cancelled fetch either
/// never resolves (its task was aborted) or is discarded by generation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Base URL is not an absolute http(s) URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True when the server rejected the session (login needed).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::HttpStatus(401) | ApiError::HttpStatus(403))
    }
}

/// Limit redirects to 3 hops and reject loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Client for the subscriptions proxy API.
///
/// There is no cookie jar: the session cookie is supplied explicitly and
/// attached to every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session_cookie: Option<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8080` or
    /// `https://host/proxy/`). Endpoint paths are appended to the base path.
    pub fn new(
        base_url: &str,
        session_cookie: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Self::with_http_client(http, base_url, session_cookie, timeout)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        session_cookie: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            session_cookie,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL the user opens in a browser to log in.
    pub fn auth_start_url(&self) -> Url {
        self.endpoint(AUTH_START_PATH)
    }

    /// Fetch one page of subscriptions for `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - Filter, page, page size and sort order, sent as query parameters
    ///
    /// # Returns
    ///
    /// The normalized page on success. Non-2xx responses map to
    /// [`ApiError::HttpStatus`], oversized bodies to
    /// [`ApiError::ResponseTooLarge`], and a missed deadline to
    /// [`ApiError::Timeout`].
    pub async fn list_subscriptions(&self, query: &QueryState) -> Result<FetchOutcome, ApiError> {
        let mut url = self.endpoint(SUBSCRIPTIONS_PATH);
        url.query_pairs_mut()
            .extend_pairs(query.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));

        tracing::debug!(
            query = %query.applied_filter,
            page = query.page,
            sort = %query.sort_order,
            "Fetching subscriptions"
        );

        let bytes = self
            .with_timeout(async {
                let response = self.authorized(self.http.get(url)).send().await?;
                let response = check_status(response)?;
                read_limited_bytes(response, MAX_RESPONSE_SIZE).await
            })
            .await?;

        let raw: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(normalize_page(&raw))
    }

    /// Unsubscribe from every id in `ids`. All-or-nothing from the client's view.
    pub async fn unsubscribe(&self, ids: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint(UNSUBSCRIBE_PATH);
        let body = serde_json::json!({ "ids": ids }).to_string();

        tracing::debug!(count = ids.len(), "Posting unsubscribe");

        self.with_timeout(async {
            let response = self
                .authorized(self.http.post(url))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            check_status(response).map(|_| ())
        })
        .await
    }

    /// Ask the backend to drop its cached subscription list.
    pub async fn refresh_cache(&self) -> Result<(), ApiError> {
        let url = self.endpoint(REFRESH_PATH);
        tracing::debug!("Posting cache refresh");

        self.with_timeout(async {
            let response = self.authorized(self.http.post(url)).send().await?;
            check_status(response).map(|_| ())
        })
        .await
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url guarantees the URL can be a base
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie.expose_secret()),
            None => request,
        }
    }

    async fn with_timeout<T, F>(&self, future: F) -> Result<T, ApiError>
    where
        F: std::future::Future<Output = Result<T, ApiError>>,
    {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| ApiError::Timeout)?
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let url =
        Url::parse(base_url.trim()).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(url)
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::HttpStatus(status.as_u16()))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
