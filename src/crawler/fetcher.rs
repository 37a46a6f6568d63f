//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during an audit, including:
//! - Building HTTP clients with browser-like headers
//! - Following redirects manually so every hop's status is recorded
//! - Classifying transport failures
//! - Honoring cancellation at each fetch boundary

use crate::config::Config;
use crate::{AuditError, ConfigError, FetchError};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Referer sent with every request; some sites reject requests without one
const REFERER: &str = "https://www.google.com/";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Outcome of a GET that produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Status code of the final response
    pub status: u16,
    /// URL of the final response after redirects
    pub final_url: String,
    /// Status codes of each redirect hop, in order
    pub redirect_history: Vec<u16>,
    /// Response body
    pub body: String,
}

impl FetchResponse {
    /// Returns true for a final 200 response
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Capability to GET a URL
///
/// Implementations must bound the time a single request may take.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page, including its body
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;

    /// Fetches the status line and redirect history of a link
    ///
    /// The body is never inspected, so implementations may skip reading it.
    /// Defaults to [`get`](Self::get).
    async fn check(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.get(url).await
    }
}

/// Builds an HTTP client with browser-like default headers
///
/// Redirects are not followed by the client; [`HttpFetcher`] walks them
/// itself to record each hop.
///
/// # Example
///
/// ```no_run
/// use link_warden::config::Config;
/// use link_warden::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, AuditError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.user_agent.accept_language).map_err(|e| {
            ConfigError::Validation(format!("Invalid accept-language header: {}", e))
        })?,
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );

    let timeout = Duration::from_secs(config.checker.request_timeout_secs);

    let client = Client::builder()
        .user_agent(config.user_agent.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_redirects: usize,
}

impl HttpFetcher {
    pub fn new(client: Client, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AuditError> {
        Ok(Self::new(
            build_http_client(config)?,
            config.checker.max_redirects,
        ))
    }
}

impl HttpFetcher {
    /// Walks redirects up to the configured limit
    ///
    /// # Request Flow
    ///
    /// | Response | Action |
    /// |----------|--------|
    /// | 3xx with usable Location | record status, follow |
    /// | 3xx without Location | treat as final |
    /// | anything else | final, body read if requested |
    /// | more than `max_redirects` hops | `TooManyRedirects` |
    ///
    /// Once the final status line has arrived, a failure while reading the
    /// body leaves the status intact and yields an empty body.
    async fn fetch(&self, url: &str, read_body: bool) -> Result<FetchResponse, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let mut redirect_history = Vec::new();

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| classify_error(url, e))?;

            let status = response.status();

            if status.is_redirection() {
                let next = response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|location| current.join(location).ok());

                if let Some(next) = next {
                    redirect_history.push(status.as_u16());
                    if redirect_history.len() > self.max_redirects {
                        return Err(FetchError::TooManyRedirects {
                            url: url.to_string(),
                        });
                    }
                    tracing::trace!("{} redirected ({}) to {}", current, status, next);
                    current = next;
                    continue;
                }
            }

            let final_url = response.url().to_string();
            let body = if read_body {
                match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("Failed to read body of {}: {}", final_url, e);
                        String::new()
                    }
                }
            } else {
                String::new()
            };

            return Ok(FetchResponse {
                status: status.as_u16(),
                final_url,
                redirect_history,
                body,
            });
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.fetch(url, true).await
    }

    async fn check(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.fetch(url, false).await
    }
}

/// Maps a reqwest error onto the transport failure taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Runs a page fetch unless the audit is cancelled first
///
/// The outer result carries cancellation; the inner one is the fetch itself.
pub async fn fetch_with_cancel(
    fetcher: &dyn Fetcher,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Result<FetchResponse, FetchError>, AuditError> {
    with_cancel(fetcher.get(url), cancel).await
}

/// Runs a body-less link check unless the audit is cancelled first
pub async fn check_with_cancel(
    fetcher: &dyn Fetcher,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Result<FetchResponse, FetchError>, AuditError> {
    with_cancel(fetcher.check(url), cancel).await
}

async fn with_cancel<F>(
    request: F,
    cancel: &CancellationToken,
) -> Result<Result<FetchResponse, FetchError>, AuditError>
where
    F: Future<Output = Result<FetchResponse, FetchError>>,
{
    if cancel.is_cancelled() {
        return Err(AuditError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuditError::Cancelled),
        result = request => Ok(result),
    }
}
