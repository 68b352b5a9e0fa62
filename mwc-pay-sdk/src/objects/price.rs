//! Canonical decimal prices.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

lazy_static! {
    /// `0`, `0.5`, `12`, `12.34`. No sign, no exponent, no redundant leading zeros.
    static ref DECIMAL_GRAMMAR: Regex =
        Regex::new(r"^(?:0(?:\.[0-9]+)?|[1-9][0-9]*(?:\.[0-9]+)?)$").expect("valid price regex");
}

/// A non-negative decimal amount exactly as the private server spells it.
///
/// The text is kept verbatim; use [`Price::to_decimal`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Price(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a canonical decimal: {0:?}")]
pub struct InvalidPrice(pub String);

impl Price {
    /// Returns `true` if `text` matches the canonical decimal grammar.
    pub fn is_canonical(text: &str) -> bool {
        DECIMAL_GRAMMAR.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Parse the price into a [`Decimal`].
    ///
    /// Fails only when the amount exceeds `Decimal`'s 28 digits of precision.
    pub fn to_decimal(&self) -> Result<Decimal, rust_decimal::Error> {
        Decimal::from_str_exact(&self.0)
    }
}

impl TryFrom<String> for Price {
    type Error = InvalidPrice;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPrice(value))
        }
    }
}

impl TryFrom<&str> for Price {
    type Error = InvalidPrice;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl FromStr for Price {
    type Err = InvalidPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Price {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
