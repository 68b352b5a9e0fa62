//! HTTP client for the MWC Pay private server.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.
//!
//! Every operation resolves to one of three outcomes: `Ok`, or a
//! [`ClientError`] that is either [`ClientError::InvalidParameters`] or
//! [`ClientError::ServerError`]. The inner error keeps the exact cause for
//! diagnostics, but callers are expected to branch on the outer variant only.

mod private_server;
mod transport;

pub use private_server::MwcPayClient;
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

use reqwest::StatusCode;

use crate::validation::FieldError;

/// Errors produced by [`MwcPayClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request was rejected locally, refused by the server with a
    /// non-5xx status, or never reached the server.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// The server failed with a 5xx status or answered with something other
    /// than the expected JSON document.
    #[error("server error: {0}")]
    ServerError(#[from] ServerError),
}

impl ClientError {
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError(_))
    }
}

/// Cause behind [`ClientError::InvalidParameters`].
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    /// A parameter failed local validation; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] FieldError),

    /// The server answered with a status that is neither 2xx nor 5xx.
    #[error("rejected with status {status}, body: {body}")]
    Rejected { status: StatusCode, body: String },

    /// No response was received.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

/// Cause behind [`ClientError::ServerError`].
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body is not JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body is JSON but does not match the expected schema.
    #[error("malformed response: {0}")]
    Schema(#[from] FieldError),
}
