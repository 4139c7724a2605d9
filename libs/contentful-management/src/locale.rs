//! Locale codes and the per-locale wire shape of localizable fields.
//!
//! The management API stores every localizable field as an object keyed by
//! locale code (`{"en": "Hello", "fr": "Bonjour"}`). In memory the SDK
//! works with one locale at a time; this module folds a single value into
//! that map on write and picks the active locale's value out of it on read.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Locale used when neither the caller nor the configuration picks one.
pub const DEFAULT_LOCALE: &str = "en";

/// Locale code such as `en` or `fr-FR`.
///
/// An empty or blank code means "unset" and becomes [`DEFAULT_LOCALE`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            Self::default()
        } else if trimmed.len() == code.len() {
            Self(code)
        } else {
            Self(trimmed.to_owned())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_owned())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Wire value of a localizable text field.
///
/// Older content returns `title`/`description` as a bare string; current
/// content returns a locale map. Both decode into this type and
/// [`resolve`](Self::resolve) hides the difference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, Value>),
}

impl LocalizedText {
    /// Text for `locale`.
    ///
    /// A plain string is returned as is. In a locale map, a missing or
    /// `null` entry resolves to the empty string.
    ///
    /// # Errors
    ///
    /// Fails when the locale's entry exists but is not a string.
    pub fn resolve<E: de::Error>(self, locale: &Locale) -> Result<String, E> {
        match self {
            Self::Plain(text) => Ok(text),
            Self::Localized(mut map) => match map.remove(locale.as_str()) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(text)) => Ok(text),
                Some(other) => Err(E::invalid_type(unexpected(&other), &"a string")),
            },
        }
    }
}

/// Decode the entry for `locale` out of an object-valued locale map.
///
/// A missing or `null` entry yields `T::default()`.
///
/// # Errors
///
/// Fails when the entry cannot be decoded into `T`.
pub fn resolve_localized<T, E>(mut map: BTreeMap<String, Value>, locale: &Locale) -> Result<T, E>
where
    T: DeserializeOwned + Default,
    E: de::Error,
{
    match map.remove(locale.as_str()) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(E::custom),
    }
}

/// Single-entry locale map `{locale: value}` for the write path.
#[must_use]
pub fn localize<T: Serialize>(locale: &Locale, value: T) -> BTreeMap<&str, T> {
    BTreeMap::from([(locale.as_str(), value)])
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(de::Unexpected::Signed)
            .or_else(|| n.as_u64().map(de::Unexpected::Unsigned))
            .or_else(|| n.as_f64().map(de::Unexpected::Float))
            .unwrap_or(de::Unexpected::Other("number")),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}
