//! Client configuration.
//!
//! Values are layered with figment: built-in defaults, then an optional YAML
//! file, then `CONTENTFUL_`-prefixed environment variables.
//!
//! ```yaml
//! access_token: CFPAT-...
//! base_url: https://api.contentful.com
//! upload_url: https://upload.contentful.com
//! default_locale: en-US
//! timeout: 45s
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use contentful_http::AccessToken;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::Deserialize;
use url::Url;

use crate::error::ContentfulError;
use crate::locale::{DEFAULT_LOCALE, Locale};

pub const DEFAULT_BASE_URL: &str = "https://api.contentful.com";
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.contentful.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_PREFIX: &str = "CONTENTFUL_";

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub access_token: AccessToken,
    pub base_url: Url,
    /// Host serving `/spaces/{s}/uploads`.
    pub upload_url: Url,
    /// Locale assets are encoded and decoded with unless the caller picks
    /// another one.
    pub default_locale: Locale,
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Permit `http://` endpoints (local mock servers).
    #[serde(default)]
    pub allow_insecure_http: bool,
}

impl ClientConfig {
    /// Configuration with default endpoints, locale and timeout.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token.into()),
            base_url: default_url(DEFAULT_BASE_URL),
            upload_url: default_url(DEFAULT_UPLOAD_URL),
            default_locale: Locale::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            allow_insecure_http: false,
        }
    }

    /// Defaults overlaid with `CONTENTFUL_*` environment variables.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Config` when a value is missing or malformed.
    pub fn from_env() -> Result<Self, ContentfulError> {
        Self::from_figment(&defaults().merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Defaults, then the YAML file at `path`, then the environment.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Config` when the file cannot be parsed or a value
    /// is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentfulError> {
        let figment = defaults()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(&figment)
    }

    /// Build from an arbitrary figment, e.g. one section of an application
    /// config. No defaults are added; use [`load`](Self::load) or
    /// [`from_env`](Self::from_env) for those.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Config` on extraction or validation failure.
    pub fn from_figment(figment: &Figment) -> Result<Self, ContentfulError> {
        let config: Self = figment
            .extract()
            .map_err(|e| ContentfulError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `ContentfulError::Config` for an empty token or an endpoint that is
    /// not `http(s)`.
    pub fn validate(&self) -> Result<(), ContentfulError> {
        if self.access_token.is_empty() {
            return Err(ContentfulError::Config(
                "access_token must not be empty".to_owned(),
            ));
        }
        for (name, url) in [("base_url", &self.base_url), ("upload_url", &self.upload_url)] {
            match url.scheme() {
                "https" => {}
                "http" => {
                    if !self.allow_insecure_http {
                        return Err(ContentfulError::Config(format!(
                            "{name} must use https (set allow_insecure_http for local testing)"
                        )));
                    }
                }
                other => {
                    return Err(ContentfulError::Config(format!(
                        "{name} has unsupported scheme '{other}'"
                    )));
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    #[must_use]
    pub fn with_upload_url(mut self, url: Url) -> Self {
        self.upload_url = url;
        self
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.default_locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn allow_insecure_http(mut self) -> Self {
        self.allow_insecure_http = true;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("upload_url", &self.upload_url.as_str())
            .field("default_locale", &self.default_locale)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("allow_insecure_http", &self.allow_insecure_http)
            .finish()
    }
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(serde_json::json!({
        "base_url": DEFAULT_BASE_URL,
        "upload_url": DEFAULT_UPLOAD_URL,
        "default_locale": DEFAULT_LOCALE,
        "timeout": humantime::format_duration(DEFAULT_TIMEOUT).to_string(),
        "allow_insecure_http": false,
    })))
}

#[allow(clippy::expect_used, reason = "only called with the constant endpoints above")]
fn default_url(raw: &'static str) -> Url {
    Url::parse(raw).expect("default endpoint is a valid URL")
}

/// `Duration` as a humantime string (`"30s"`, `"1m 30s"`).
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = ClientConfig::new("CFPAT-x");
        assert_eq!(config.base_url.as_str(), "https://api.contentful.com/");
        assert_eq!(config.upload_url.as_str(), "https://upload.contentful.com/");
        assert_eq!(config.default_locale.as_str(), "en");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("CFPAT-very-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn validate_rejects_empty_token() {
        let err = ClientConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, ContentfulError::Config(msg) if msg.contains("access_token")));
    }

    #[test]
    fn validate_rejects_plain_http_unless_allowed() {
        let url = Url::parse("http://localhost:8080").unwrap();
        let config = ClientConfig::new("t").with_base_url(url);
        assert!(config.validate().is_err());
        assert!(config.allow_insecure_http().validate().is_ok());
    }

    #[test]
    fn validate_rejects_other_schemes() {
        let url = Url::parse("ftp://uploads.example.com").unwrap();
        let err = ClientConfig::new("t").with_upload_url(url).validate().unwrap_err();
        assert!(err.to_string().contains("upload_url"));
    }

    #[test]
    fn figment_defaults_fill_missing_keys() {
        let figment = defaults().merge(Serialized::defaults(serde_json::json!({
            "access_token": "CFPAT-fig",
            "timeout": "1m 30s",
            "default_locale": "de-DE",
        })));
        let config = ClientConfig::from_figment(&figment).unwrap();
        assert_eq!(config.access_token.expose(), "CFPAT-fig");
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.default_locale.as_str(), "de-DE");
        assert_eq!(config.base_url.as_str(), "https://api.contentful.com/");
    }

    #[test]
    fn blank_default_locale_means_en() {
        let figment = defaults().merge(Serialized::defaults(serde_json::json!({
            "access_token": "t",
            "default_locale": " ",
        })));
        let config = ClientConfig::from_figment(&figment).unwrap();
        assert_eq!(config.default_locale.as_str(), "en");
    }

    #[test]
    fn bad_duration_is_a_config_error() {
        let figment = defaults().merge(Serialized::defaults(serde_json::json!({
            "access_token": "t",
            "timeout": "soon",
        })));
        let err = ClientConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, ContentfulError::Config(_)));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = ClientConfig::from_figment(&defaults()).unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }
}
