//! MWC Pay private server client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::transport::{HttpTransport, Transport, TransportResponse};
use super::{ClientError, ParameterError, ServerError};
use crate::config::{ClientConfig, ConfigError, TransportScheme};
use crate::objects::{
    PaymentCreationRequest, PaymentHandle, PaymentStatus, Price, PublicServerInfo,
    ResponseObject, encode_query,
};
use crate::validation;

const CREATE_PAYMENT_PATH: &str = "/create_payment";
const GET_PAYMENT_INFO_PATH: &str = "/get_payment_info";
const GET_PRICE_PATH: &str = "/get_price";
const GET_PUBLIC_SERVER_INFO_PATH: &str = "/get_public_server_info";

/// Typed client for the MWC Pay **private server** API.
///
/// Every operation is a single GET with no retries. The server's answer is
/// validated in full before it is returned, so a successful result is
/// always complete.
///
/// The client holds no mutable state and is cheap to clone; clones share
/// the same transport.
#[derive(Clone)]
pub struct MwcPayClient {
    private_server: Arc<str>,
    scheme: TransportScheme,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for MwcPayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MwcPayClient")
            .field("private_server", &self.private_server)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl MwcPayClient {
    /// Create a client for `private_server` (e.g. `http://localhost:9010`).
    pub fn new(private_server: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::new(private_server))
    }

    /// Create a client from a loaded [`ClientConfig`].
    ///
    /// The transport scheme is decided here, once, from the endpoint.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheme = config.scheme();
        let transport = HttpTransport::new(scheme, config.request_timeout()).map_err(|e| {
            ConfigError::InvalidConfig(format!("failed to build http transport: {e}"))
        })?;
        Ok(Self::with_transport(config.private_server.clone(), transport))
    }

    /// Create a client that sends its requests through `transport`.
    pub fn with_transport(
        private_server: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Self {
        let private_server: String = private_server.into();
        Self {
            scheme: TransportScheme::from_endpoint(&private_server),
            private_server: private_server.into(),
            transport: Arc::new(transport),
        }
    }

    pub fn private_server(&self) -> &str {
        &self.private_server
    }

    pub fn scheme(&self) -> TransportScheme {
        self.scheme
    }

    /// `GET /create_payment` – create a new payment.
    pub async fn create_payment(
        &self,
        request: &PaymentCreationRequest,
    ) -> Result<PaymentHandle, ClientError> {
        request.validate().map_err(ParameterError::Invalid)?;
        self.fetch(CREATE_PAYMENT_PATH, Some(request.query_string())).await
    }

    /// Like [`Self::create_payment`], with the parameters given as a JSON
    /// object keyed by wire name.
    pub async fn create_payment_from_json(
        &self,
        params: &Value,
    ) -> Result<PaymentHandle, ClientError> {
        let request =
            PaymentCreationRequest::from_json(params).map_err(ParameterError::Invalid)?;
        self.create_payment(&request).await
    }

    /// `GET /get_payment_info` – current status of a payment.
    pub async fn get_payment_info(&self, payment_id: &str) -> Result<PaymentStatus, ClientError> {
        validation::non_empty("payment_id", payment_id).map_err(ParameterError::Invalid)?;
        let query = encode_query([("payment_id", payment_id)]);
        self.fetch(GET_PAYMENT_INFO_PATH, Some(query)).await
    }

    /// `GET /get_price` – the server's current price.
    pub async fn get_price(&self) -> Result<Price, ClientError> {
        self.fetch(GET_PRICE_PATH, None).await
    }

    /// `GET /get_public_server_info` – how payers reach the public server.
    pub async fn get_public_server_info(&self) -> Result<PublicServerInfo, ClientError> {
        self.fetch(GET_PUBLIC_SERVER_INFO_PATH, None).await
    }

    async fn fetch<T: ResponseObject>(
        &self,
        path: &'static str,
        query: Option<String>,
    ) -> Result<T, ClientError> {
        let url = match query {
            Some(query) => format!("{}{path}?{query}", self.private_server),
            None => format!("{}{path}", self.private_server),
        };

        debug!(path, scheme = ?self.scheme, "Sending request to private server");

        let resp = self.transport.get(&url).await.map_err(|e| {
            warn!(error = %e, path, "Private server request failed");
            ParameterError::Transport(e)
        })?;

        let value = parse_response(path, resp)?;
        T::from_json(&value).map_err(|e| {
            warn!(error = %e, path, "Private server response failed validation");
            ServerError::Schema(e).into()
        })
    }
}

fn parse_response(path: &'static str, resp: TransportResponse) -> Result<Value, ClientError> {
    let status = resp.status;
    if !status.is_success() {
        let body = String::from_utf8_lossy(&resp.body).into_owned();
        warn!(%status, path, "Private server returned an error status");
        return Err(if status.is_server_error() {
            ServerError::Status { status, body }.into()
        } else {
            ParameterError::Rejected { status, body }.into()
        });
    }
    serde_json::from_slice(&resp.body).map_err(|e| {
        warn!(error = %e, path, "Private server response is not JSON");
        ServerError::Json(e).into()
    })
}
