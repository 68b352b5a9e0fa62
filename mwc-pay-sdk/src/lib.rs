//! Client SDK for the MWC Pay private server.
//!
//! The private server creates payments, reports their status and price, and
//! tells merchants where the public payment server can be reached. This
//! crate wraps that API in [`MwcPayClient`] and never hands back a response
//! it has not fully validated.
//!
//! ```ignore
//! use mwc_pay_sdk::{MwcPayClient, PaymentCreationRequest};
//!
//! let client = MwcPayClient::new("http://localhost:9010")?;
//! let request = PaymentCreationRequest::new("https://shop.example.com/completed")
//!     .with_price("123.456")
//!     .with_required_confirmations(5)
//!     .with_timeout(600);
//! let payment = client.create_payment(&request).await?;
//! let status = client.get_payment_info(&payment.payment_id).await?;
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
pub mod validation;

#[cfg(feature = "client")]
pub use client::{ClientError, MwcPayClient};
pub use config::{ClientConfig, ConfigError, TransportScheme};
pub use objects::{
    PaymentCreationRequest, PaymentHandle, PaymentStatus, Price, PublicServerInfo,
};
