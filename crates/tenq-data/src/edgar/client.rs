//! HTTP access to the SEC EDGAR archive.
//!
//! Every request carries the identifying header set the archive's fair-access
//! policy requires. Requests go through the [`Transport`] trait so the
//! fetching components can be driven by a scripted transport in tests.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};

/// SEC EDGAR archive base URL
pub const ARCHIVE_BASE_URL: &str = "https://www.sec.gov/Archives";

/// User agent for SEC EDGAR requests (SEC requires identifying information)
pub const DEFAULT_USER_AGENT: &str = "tenq/0.1 (research@example.com)";

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate";
const CONNECTION_VALUE: &str = "keep-alive";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A failure below the HTTP layer: timeout, connection reset, DNS and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Issues GET requests against the archive.
///
/// Non-2xx statuses are returned as an [`HttpResponse`]; only network-level
/// failures are reported as [`TransportError`]. Callers decide what a status
/// means.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the status and body.
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}

/// Build the identifying header set sent with every archive request.
///
/// A missing or malformed identity makes the archive answer HTTP 403.
///
/// # Errors
/// `DataError::InvalidUserAgent` if `user_agent` is not a valid header value.
pub fn identity_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(user_agent).map_err(|e| DataError::InvalidUserAgent {
        user_agent: user_agent.to_string(),
        reason: e.to_string(),
    })?;
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static(ACCEPT_ENCODING_VALUE),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(CONNECTION, HeaderValue::from_static(CONNECTION_VALUE));
    Ok(headers)
}

/// SEC EDGAR archive client.
///
/// Carries no request timeout: index fetches are bounded by the retry policy
/// of [`IndexFetcher`](super::index::IndexFetcher), not by a deadline.
#[derive(Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    user_agent: String,
}

impl EdgarClient {
    /// Create a client identifying itself with the default user agent.
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a client identifying itself with `user_agent`.
    ///
    /// The SEC asks for a descriptive identity with contact details, e.g.
    /// `"Example Research research@example.com"`.
    ///
    /// # Example
    /// ```
    /// use tenq_data::edgar::EdgarClient;
    ///
    /// let client = EdgarClient::with_user_agent("Example Research research@example.com")?;
    /// assert_eq!(client.user_agent(), "Example Research research@example.com");
    /// # Ok::<(), tenq_data::DataError>(())
    /// ```
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(identity_headers(user_agent)?)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// The identity string sent as `User-Agent`.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl Transport for EdgarClient {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        debug!("{} -> HTTP {}", url, status);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Fetch `url` once, mapping transport failures and non-2xx statuses to
/// [`DataError::FetchError`].
pub(crate) async fn fetch_once<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<String> {
    let response = transport
        .get(url)
        .await
        .map_err(|e| DataError::FetchError {
            url: url.to_string(),
            status: None,
            reason: e.to_string(),
        })?;

    if !response.is_success() {
        return Err(DataError::FetchError {
            url: url.to_string(),
            status: Some(response.status),
            reason: "unexpected HTTP status".to_string(),
        });
    }

    Ok(response.body)
}
