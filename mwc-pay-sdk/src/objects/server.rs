//! Public server discovery.

use serde::Serialize;
use serde_json::Value;

use super::ResponseObject;
use crate::validation::{FieldError, ObjectReader};

/// Where payers reach the public side of the payment server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicServerInfo {
    pub url: String,
    /// `None` when the server has no Onion Service.
    pub onion_service_address: Option<String>,
}

impl ResponseObject for PublicServerInfo {
    fn from_json(value: &Value) -> Result<Self, FieldError> {
        let reader = ObjectReader::response(value)?;
        Ok(Self {
            url: reader.non_empty_string("url")?.to_owned(),
            onion_service_address: reader
                .nullable_non_empty_string("onion_service_address")?
                .map(str::to_owned),
        })
    }
}
