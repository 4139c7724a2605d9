//! Credential handling for the `Authorization` header.

use std::fmt;

use http::HeaderValue;
use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::HttpError;

/// Content management API token.
///
/// Formatting never reveals the value and the buffer is wiped on drop.
/// The only way out is [`bearer_header`](Self::bearer_header) (or
/// [`expose`](Self::expose) for callers that really need the raw string).
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token. Must not be logged or persisted.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `Bearer <token>` marked sensitive so hyper never logs it.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidHeaderValue` if the token contains bytes
    /// that are not allowed in a header.
    pub fn bearer_header(&self) -> Result<HeaderValue, HttpError> {
        let raw = zeroize::Zeroizing::new(format!("Bearer {}", self.0));
        let mut value = HeaderValue::from_str(&raw)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}
