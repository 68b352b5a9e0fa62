//! Request and response types for the MWC Pay private server API.
//!
//! Response types are built only through [`ResponseObject::from_json`], which
//! validates the whole document before anything is returned.

mod payment;
mod price;
mod server;

pub use payment::{PaymentCreationRequest, PaymentHandle, PaymentStatus};
pub use price::{InvalidPrice, Price};
pub use server::PublicServerInfo;

#[cfg(feature = "client")]
pub(crate) use payment::encode_query;

use serde_json::Value;

use crate::validation::{FieldError, ObjectReader};

/// A value that can be read out of a private server response body.
pub trait ResponseObject: Sized {
    /// Validate `value` against this type's schema.
    ///
    /// Either every field checks out or the first failing field is reported.
    fn from_json(value: &Value) -> Result<Self, FieldError>;
}

/// `GET /get_price` answers `{"price": "<decimal>"}`.
impl ResponseObject for Price {
    fn from_json(value: &Value) -> Result<Self, FieldError> {
        ObjectReader::response(value)?.price("price")
    }
}
