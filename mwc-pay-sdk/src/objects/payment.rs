//! Payment creation and payment status types.

use serde::Serialize;
use serde_json::Value;

use super::{Price, ResponseObject};
use crate::validation::{self, FieldError, FieldErrorKind, ObjectReader};

/// Parameters for `GET /create_payment`.
///
/// Fields are public so a request can be assembled from any source; the
/// client runs [`PaymentCreationRequest::validate`] before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentCreationRequest {
    /// Amount to request. `None` lets the private server price it.
    pub price: Option<String>,
    pub required_confirmations: Option<u64>,
    /// Seconds until the payment expires.
    pub timeout: Option<u64>,
    pub completed_callback: String,
    pub received_callback: Option<String>,
    pub confirmed_callback: Option<String>,
    pub expired_callback: Option<String>,
}

impl PaymentCreationRequest {
    pub fn new(completed_callback: impl Into<String>) -> Self {
        Self {
            price: None,
            required_confirmations: None,
            timeout: None,
            completed_callback: completed_callback.into(),
            received_callback: None,
            confirmed_callback: None,
            expired_callback: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_required_confirmations(mut self, required_confirmations: u64) -> Self {
        self.required_confirmations = Some(required_confirmations);
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_received_callback(mut self, url: impl Into<String>) -> Self {
        self.received_callback = Some(url.into());
        self
    }

    pub fn with_confirmed_callback(mut self, url: impl Into<String>) -> Self {
        self.confirmed_callback = Some(url.into());
        self
    }

    pub fn with_expired_callback(mut self, url: impl Into<String>) -> Self {
        self.expired_callback = Some(url.into());
        self
    }

    /// Build a request from an untyped JSON object.
    ///
    /// Keys use the wire names (`price`, `required_confirmations`, ...).
    /// Optional keys may be absent or `null`; present values must have the
    /// right JSON type. Value-level checks are left to [`Self::validate`].
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        let reader = ObjectReader::parameters(value)?;
        let owned = |s: Option<&str>| s.map(str::to_owned);
        Ok(Self {
            price: owned(reader.nullable_string("price")?),
            required_confirmations: reader.nullable_unsigned("required_confirmations")?,
            timeout: reader.nullable_unsigned("timeout")?,
            completed_callback: reader.string("completed_callback")?.to_owned(),
            received_callback: owned(reader.nullable_string("received_callback")?),
            confirmed_callback: owned(reader.nullable_string("confirmed_callback")?),
            expired_callback: owned(reader.nullable_string("expired_callback")?),
        })
    }

    /// Check the value-level invariants before the request leaves the process.
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(price) = &self.price {
            if !Price::is_canonical(price) {
                return Err(FieldError::new("price", FieldErrorKind::NotDecimal));
            }
        }
        if let Some(n) = self.required_confirmations {
            validation::positive("required_confirmations", n)?;
        }
        if let Some(n) = self.timeout {
            validation::positive("timeout", n)?;
        }
        validation::non_empty("completed_callback", &self.completed_callback)?;
        for (field, url) in [
            ("received_callback", &self.received_callback),
            ("confirmed_callback", &self.confirmed_callback),
            ("expired_callback", &self.expired_callback),
        ] {
            if let Some(url) = url {
                validation::non_empty(field, url)?;
            }
        }
        Ok(())
    }

    /// URL-encoded query string holding only the fields that are set.
    pub fn query_string(&self) -> String {
        let required_confirmations = self.required_confirmations.map(|n| n.to_string());
        let timeout = self.timeout.map(|n| n.to_string());
        let pairs = [
            ("price", self.price.as_deref()),
            ("required_confirmations", required_confirmations.as_deref()),
            ("timeout", timeout.as_deref()),
            ("completed_callback", Some(self.completed_callback.as_str())),
            ("received_callback", self.received_callback.as_deref()),
            ("confirmed_callback", self.confirmed_callback.as_deref()),
            ("expired_callback", self.expired_callback.as_deref()),
        ];
        encode_query(pairs.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))))
    }
}

pub(crate) fn encode_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returned by `GET /create_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentHandle {
    /// Opaque identifier for later [`PaymentStatus`] lookups.
    pub payment_id: String,
    pub url: String,
    pub recipient_payment_proof_address: String,
}

impl ResponseObject for PaymentHandle {
    fn from_json(value: &Value) -> Result<Self, FieldError> {
        let reader = ObjectReader::response(value)?;
        Ok(Self {
            payment_id: reader.non_empty_string("payment_id")?.to_owned(),
            url: reader.non_empty_string("url")?.to_owned(),
            recipient_payment_proof_address: reader
                .non_empty_string("recipient_payment_proof_address")?
                .to_owned(),
        })
    }
}

/// Snapshot returned by `GET /get_payment_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentStatus {
    pub url: String,
    /// `None` when the payment accepts any amount.
    pub price: Option<Price>,
    pub required_confirmations: u64,
    pub received: bool,
    /// Never greater than `required_confirmations`.
    pub confirmations: u64,
    /// Seconds left before expiry, if the payment can expire.
    pub time_remaining: Option<u64>,
    pub status: String,
    pub recipient_payment_proof_address: String,
}

impl ResponseObject for PaymentStatus {
    fn from_json(value: &Value) -> Result<Self, FieldError> {
        let reader = ObjectReader::response(value)?;
        let url = reader.non_empty_string("url")?.to_owned();
        let price = reader.nullable_price("price")?;
        let required_confirmations = reader.positive("required_confirmations")?;
        let received = reader.boolean("received")?;
        let confirmations = reader.unsigned("confirmations")?;
        if confirmations > required_confirmations {
            return Err(FieldError::new(
                "confirmations",
                FieldErrorKind::Exceeds("required_confirmations"),
            ));
        }
        Ok(Self {
            url,
            price,
            required_confirmations,
            received,
            confirmations,
            time_remaining: reader.nullable_unsigned("time_remaining")?,
            status: reader.string("status")?.to_owned(),
            recipient_payment_proof_address: reader
                .non_empty_string("recipient_payment_proof_address")?
                .to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_json() -> Value {
        json!({
            "url": "https://pay.example.com/p1",
            "price": "123.456",
            "required_confirmations": 5,
            "received": true,
            "confirmations": 5,
            "time_remaining": 0,
            "status": "Completed",
            "recipient_payment_proof_address": "addr1"
        })
    }

    #[test]
    fn test_query_string_skips_unset_fields() {
        let request = PaymentCreationRequest::new("http://example.com/completed?a=1&b=2")
            .with_timeout(600);
        assert_eq!(
            request.query_string(),
            "timeout=600&completed_callback=http%3A%2F%2Fexample.com%2Fcompleted%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_query_string_field_order() {
        let request = PaymentCreationRequest::new("c")
            .with_expired_callback("e")
            .with_price("1.5")
            .with_received_callback("r")
            .with_required_confirmations(3)
            .with_confirmed_callback("f");
        assert_eq!(
            request.query_string(),
            "price=1.5&required_confirmations=3&completed_callback=c\
             &received_callback=r&confirmed_callback=f&expired_callback=e"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = PaymentCreationRequest::new("http://example.com/completed");
        assert!(base.validate().is_ok());

        let cases = [
            (base.clone().with_price("01"), "price"),
            (base.clone().with_price("-1"), "price"),
            (base.clone().with_required_confirmations(0), "required_confirmations"),
            (base.clone().with_timeout(0), "timeout"),
            (PaymentCreationRequest::new(""), "completed_callback"),
            (base.clone().with_received_callback(""), "received_callback"),
            (base.clone().with_confirmed_callback(""), "confirmed_callback"),
            (base.clone().with_expired_callback(""), "expired_callback"),
        ];
        for (request, field) in cases {
            assert_eq!(request.validate().unwrap_err().field, field);
        }
    }

    #[test]
    fn test_request_from_json() {
        let request = PaymentCreationRequest::from_json(&json!({
            "price": "1.5",
            "required_confirmations": 2,
            "timeout": null,
            "completed_callback": "c",
            "expired_callback": "e"
        }))
        .unwrap();
        assert_eq!(
            request,
            PaymentCreationRequest::new("c")
                .with_price("1.5")
                .with_required_confirmations(2)
                .with_expired_callback("e")
        );
    }

    #[test]
    fn test_request_from_json_type_errors() {
        let cases = [
            (json!({ "completed_callback": 1 }), "completed_callback"),
            (json!({}), "completed_callback"),
            (json!({ "price": 1.5, "completed_callback": "c" }), "price"),
            (json!({ "timeout": "600", "completed_callback": "c" }), "timeout"),
            (
                json!({ "required_confirmations": true, "completed_callback": "c" }),
                "required_confirmations",
            ),
            (json!({ "received_callback": [], "completed_callback": "c" }), "received_callback"),
        ];
        for (doc, field) in cases {
            assert_eq!(PaymentCreationRequest::from_json(&doc).unwrap_err().field, field);
        }
    }

    #[test]
    fn test_request_from_json_defers_value_checks() {
        let request = PaymentCreationRequest::from_json(&json!({
            "price": "01",
            "completed_callback": "c",
            "received_callback": ""
        }))
        .unwrap();
        assert_eq!(request.price.as_deref(), Some("01"));
        assert_eq!(request.validate().unwrap_err().field, "price");
    }

    #[test]
    fn test_payment_handle_requires_non_empty_strings() {
        let ok = json!({ "payment_id": "p1", "url": "u", "recipient_payment_proof_address": "a" });
        assert_eq!(PaymentHandle::from_json(&ok).unwrap().payment_id, "p1");

        for field in ["payment_id", "url", "recipient_payment_proof_address"] {
            let mut doc = ok.clone();
            doc[field] = json!("");
            assert_eq!(PaymentHandle::from_json(&doc).unwrap_err().field, field);
            doc[field] = json!(7);
            assert_eq!(PaymentHandle::from_json(&doc).unwrap_err().field, field);
            doc.as_object_mut().unwrap().remove(field);
            assert_eq!(PaymentHandle::from_json(&doc).unwrap_err().field, field);
        }
    }

    #[test]
    fn test_payment_status_at_confirmation_boundary() {
        let status = PaymentStatus::from_json(&status_json()).unwrap();
        assert_eq!(status.confirmations, status.required_confirmations);
        assert_eq!(status.price.as_ref().map(Price::as_str), Some("123.456"));
        assert_eq!(status.time_remaining, Some(0));

        let mut doc = status_json();
        doc["confirmations"] = json!(6);
        assert_eq!(
            PaymentStatus::from_json(&doc).unwrap_err(),
            FieldError::new("confirmations", FieldErrorKind::Exceeds("required_confirmations"))
        );
    }

    #[test]
    fn test_payment_status_field_violations() {
        let cases = [
            ("url", json!("")),
            ("price", json!("1e5")),
            ("price", json!(5)),
            ("required_confirmations", json!(0)),
            ("received", json!("yes")),
            ("confirmations", json!(-1)),
            ("time_remaining", json!(-3)),
            ("time_remaining", json!(1.5)),
            ("status", json!(null)),
            ("recipient_payment_proof_address", json!("")),
        ];
        for (field, value) in cases {
            let mut doc = status_json();
            doc[field] = value;
            assert_eq!(PaymentStatus::from_json(&doc).unwrap_err().field, field);
        }
    }

    #[test]
    fn test_payment_status_nullable_fields() {
        let mut doc = status_json();
        doc["price"] = Value::Null;
        doc["time_remaining"] = Value::Null;
        let status = PaymentStatus::from_json(&doc).unwrap();
        assert_eq!(status.price, None);
        assert_eq!(status.time_remaining, None);

        doc.as_object_mut().unwrap().remove("price");
        assert_eq!(
            PaymentStatus::from_json(&doc).unwrap_err(),
            FieldError::new("price", FieldErrorKind::Missing)
        );
    }
}
