//! Transport scheme selection.

use url::Url;

/// Which transport the client talks to the private server over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportScheme {
    /// Plain HTTP.
    Plain,
    /// HTTP over TLS. The transport refuses to downgrade to plain HTTP.
    Tls,
}

impl TransportScheme {
    /// Pick the scheme for `endpoint`.
    ///
    /// Only an `https` endpoint selects [`TransportScheme::Tls`]. An endpoint
    /// that does not parse as a URL falls back to [`TransportScheme::Plain`]
    /// without error; the request itself will then fail at the transport.
    pub fn from_endpoint(endpoint: &str) -> Self {
        match Url::parse(endpoint) {
            Ok(url) if url.scheme() == "https" => Self::Tls,
            Ok(_) => Self::Plain,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    endpoint,
                    "Unparsable private server URL, using plain transport"
                );
                Self::Plain
            }
        }
    }

    pub fn is_tls(self) -> bool {
        self == Self::Tls
    }
}
