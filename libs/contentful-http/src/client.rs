use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use tower::util::BoxCloneSyncService;

use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;

/// Type-erased tower stack every request goes through.
pub type ClientService =
    BoxCloneSyncService<Request<Full<Bytes>>, Response<ResponseBody>, HttpError>;

/// HTTP client over a tower middleware stack.
///
/// `Clone + Send + Sync`; clones share the connection pool. Each request
/// clones the boxed service and drives it to completion, so no locking is
/// needed around the client.
///
/// ```ignore
/// let client = HttpClient::builder()
///     .access_token(AccessToken::new("CFPAT-..."))
///     .build()?;
/// let body = client
///     .get("https://api.contentful.com/spaces/abc/assets")
///     .send()
///     .await?
///     .checked_bytes()
///     .await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: ClientService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl HttpClient {
    /// Client with default configuration and no credentials.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Request builder for an arbitrary method.
    pub fn request(&self, method: http::Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            method,
            url.to_owned(),
            self.transport_security,
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::DELETE, url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("transport_security", &self.transport_security)
            .finish_non_exhaustive()
    }
}
