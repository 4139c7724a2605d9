use std::time::Duration;

use crate::token::AccessToken;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("contentful-http/", env!("CARGO_PKG_VERSION"));

/// Default cap on response bodies (after decompression).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Transport security configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// HTTPS only
    #[default]
    TlsOnly,
    /// Also accept plain `http://` URLs. Meant for local mock servers.
    AllowInsecureHttp,
}

/// Settings consumed by [`HttpClientBuilder`](crate::HttpClientBuilder).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout (default: 30 seconds)
    pub request_timeout: Duration,

    /// Maximum response body size in bytes (default: 10 MB)
    pub max_body_size: usize,

    /// User-Agent header value, inserted when a request has none
    pub user_agent: String,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// Bearer token attached to every request that has no `Authorization` header
    pub access_token: Option<AccessToken>,

    /// Idle connection lifetime (default: 90 seconds, `None` = hyper-util default)
    pub pool_idle_timeout: Option<Duration>,

    /// Idle connections kept per host (default: 32)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            access_token: None,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}
