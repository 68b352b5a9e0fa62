//! The HTTP seam between [`MwcPayClient`](super::MwcPayClient) and the network.
//!
//! The client only ever needs "GET this URL and hand me the status and the
//! whole body". [`HttpTransport`] does that with `reqwest`; anything else
//! implementing [`Transport`] can stand in for it.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};

use crate::config::TransportScheme;

/// Status and fully drained body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure to complete an exchange at all (no status was received).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, TLS, connection reset, timeout, ...
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-`reqwest` transport could not reach the server.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// One-shot HTTP GET.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET for `url` and wait for the complete response body.
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed [`Transport`].
///
/// Idle connections are never kept, so every call opens a fresh one.
/// Redirects are not followed; a 3xx comes back as the response.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport for `scheme`.
    ///
    /// With [`TransportScheme::Tls`] the client refuses any plain-HTTP URL,
    /// redirects included.
    pub fn new(
        scheme: TransportScheme,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(0)
            .redirect(Policy::none())
            .https_only(scheme.is_tls());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wrap an existing `reqwest::Client` (e.g. to configure a proxy).
    pub fn with_http_client(client: Client) -> Self {
        Self { http: client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = if status.is_success() {
            resp.bytes().await?
        } else {
            // The body of a failed request is diagnostic only.
            resp.bytes().await.unwrap_or_default()
        };
        Ok(TransportResponse { status, body })
    }
}
