//! Structural validation of untyped JSON objects.
//!
//! Every response from the private server is parsed into a
//! [`serde_json::Value`] first and then read field by field through an
//! [`ObjectReader`]. The reader never coerces: a number is not a string, a
//! float is not an integer, and a missing key is not the same as `null`.
//! The first failing field aborts the whole read, so callers never see a
//! partially populated object.

use serde_json::{Map, Value};

use crate::objects::Price;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` {kind}")]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldErrorKind {
    #[error("must be a JSON object")]
    NotObject,
    #[error("is missing")]
    Missing,
    #[error("must be a string")]
    NotString,
    #[error("must not be empty")]
    Empty,
    #[error("must be a boolean")]
    NotBoolean,
    #[error("must be an integer")]
    NotInteger,
    #[error("must not be negative")]
    Negative,
    #[error("must be positive")]
    NotPositive,
    #[error("is not a canonical decimal")]
    NotDecimal,
    #[error("must not exceed `{0}`")]
    Exceeds(&'static str),
}

/// Name used in [`FieldError`] when the document itself is not an object.
pub const ROOT: &str = "<root>";

/// How an absent key is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Absence {
    /// The key must be present; nullable fields must spell out `null`.
    Forbidden,
    /// An absent key reads the same as `null`.
    AsNull,
}

/// Field-by-field reader over a JSON object.
#[derive(Debug)]
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    absence: Absence,
}

impl<'a> ObjectReader<'a> {
    /// Reader for server responses: every schema key must be present.
    pub fn response(value: &'a Value) -> Result<Self, FieldError> {
        Self::with_absence(value, Absence::Forbidden)
    }

    /// Reader for caller-supplied parameters: absent keys count as `null`.
    pub fn parameters(value: &'a Value) -> Result<Self, FieldError> {
        Self::with_absence(value, Absence::AsNull)
    }

    fn with_absence(value: &'a Value, absence: Absence) -> Result<Self, FieldError> {
        match value {
            Value::Object(object) => Ok(Self { object, absence }),
            _ => Err(FieldError::new(ROOT, FieldErrorKind::NotObject)),
        }
    }

    /// The raw value, with `None` for an explicit or tolerated `null`.
    fn nullable(&self, field: &'static str) -> Result<Option<&'a Value>, FieldError> {
        match self.object.get(field) {
            Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(value)),
            None if self.absence == Absence::AsNull => Ok(None),
            None => Err(FieldError::new(field, FieldErrorKind::Missing)),
        }
    }

    fn required(&self, field: &'static str) -> Result<&'a Value, FieldError> {
        self.nullable(field)?
            .ok_or_else(|| FieldError::new(field, FieldErrorKind::Missing))
    }

    /// Any string, including the empty one.
    pub fn string(&self, field: &'static str) -> Result<&'a str, FieldError> {
        as_str(field, self.required(field)?)
    }

    pub fn nullable_string(&self, field: &'static str) -> Result<Option<&'a str>, FieldError> {
        self.nullable(field)?.map(|value| as_str(field, value)).transpose()
    }

    pub fn non_empty_string(&self, field: &'static str) -> Result<&'a str, FieldError> {
        non_empty(field, self.string(field)?)
    }

    pub fn nullable_non_empty_string(
        &self,
        field: &'static str,
    ) -> Result<Option<&'a str>, FieldError> {
        self.nullable(field)?
            .map(|value| as_str(field, value).and_then(|s| non_empty(field, s)))
            .transpose()
    }

    pub fn boolean(&self, field: &'static str) -> Result<bool, FieldError> {
        self.required(field)?
            .as_bool()
            .ok_or_else(|| FieldError::new(field, FieldErrorKind::NotBoolean))
    }

    /// A non-negative integer.
    pub fn unsigned(&self, field: &'static str) -> Result<u64, FieldError> {
        as_unsigned(field, self.required(field)?)
    }

    /// An integer greater than zero.
    pub fn positive(&self, field: &'static str) -> Result<u64, FieldError> {
        positive(field, self.unsigned(field)?)
    }

    pub fn nullable_unsigned(&self, field: &'static str) -> Result<Option<u64>, FieldError> {
        self.nullable(field)?
            .map(|value| as_unsigned(field, value))
            .transpose()
    }

    pub fn price(&self, field: &'static str) -> Result<Price, FieldError> {
        as_price(field, self.required(field)?)
    }

    pub fn nullable_price(&self, field: &'static str) -> Result<Option<Price>, FieldError> {
        self.nullable(field)?
            .map(|value| as_price(field, value))
            .transpose()
    }
}

fn as_str<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, FieldError> {
    value
        .as_str()
        .ok_or_else(|| FieldError::new(field, FieldErrorKind::NotString))
}

pub(crate) fn non_empty<'a>(field: &'static str, s: &'a str) -> Result<&'a str, FieldError> {
    if s.is_empty() {
        Err(FieldError::new(field, FieldErrorKind::Empty))
    } else {
        Ok(s)
    }
}

pub(crate) fn positive(field: &'static str, n: u64) -> Result<u64, FieldError> {
    if n == 0 {
        Err(FieldError::new(field, FieldErrorKind::NotPositive))
    } else {
        Ok(n)
    }
}

fn as_unsigned(field: &'static str, value: &Value) -> Result<u64, FieldError> {
    let Value::Number(number) = value else {
        return Err(FieldError::new(field, FieldErrorKind::NotInteger));
    };
    if let Some(n) = number.as_u64() {
        Ok(n)
    } else if number.as_i64().is_some() {
        Err(FieldError::new(field, FieldErrorKind::Negative))
    } else {
        Err(FieldError::new(field, FieldErrorKind::NotInteger))
    }
}

fn as_price(field: &'static str, value: &Value) -> Result<Price, FieldError> {
    let text = as_str(field, value)?;
    Price::try_from(text).map_err(|_| FieldError::new(field, FieldErrorKind::NotDecimal))
}
