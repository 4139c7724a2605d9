use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use serde::Serialize;
use tower::ServiceExt;

use crate::client::ClientService;
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;

#[derive(Clone, Debug)]
enum BodyKind {
    Empty,
    Bytes(Bytes),
    Json(Bytes),
}

/// Fluent request builder returned by [`HttpClient`](crate::HttpClient).
///
/// The URL must already carry its query string; compose it with `url::Url`.
/// Invalid headers are remembered and reported by [`send`](Self::send).
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: ClientService,
    max_body_size: usize,
    method: http::Method,
    url: String,
    headers: Vec<(http::header::HeaderName, http::header::HeaderValue)>,
    body: BodyKind,
    error: Option<HttpError>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: ClientService,
        max_body_size: usize,
        method: http::Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            headers: Vec::new(),
            body: BodyKind::Empty,
            error: None,
            transport_security,
        }
    }

    /// Add a single header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Add several headers; stops at the first invalid one.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| {
                builder.header(name.as_ref(), value.as_ref())
            })
    }

    /// Serialize `body` as JSON. `Content-Type: application/json` is added
    /// at send time unless the caller set a content type.
    ///
    /// # Errors
    ///
    /// Returns a previously deferred header error, or `HttpError::Json`.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let json = serde_json::to_vec(body)?;
        self.body = BodyKind::Json(Bytes::from(json));
        Ok(self)
    }

    /// Send pre-encoded bytes verbatim.
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = BodyKind::Bytes(body.into());
        self
    }

    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let uri: http::Uri =
            self.url
                .parse()
                .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
                    url: self.url.clone(),
                    kind: InvalidUriKind::ParseError,
                    reason: e.to_string(),
                })?;

        if uri.authority().is_none() {
            return Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingAuthority,
                reason: "missing host/authority".to_owned(),
            });
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") => match self.transport_security {
                TransportSecurity::AllowInsecureHttp => Ok(uri),
                TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                }),
            },
            Some(scheme) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            None => Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingScheme,
                reason: "missing scheme".to_owned(),
            }),
        }
    }

    /// Send the request.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` for deferred header errors, URL or scheme
    /// violations, transport failures and timeouts. HTTP error statuses are
    /// returned as `Ok`.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method.clone()).uri(uri);

        let has_content_type = self
            .headers
            .iter()
            .any(|(name, _)| name == http::header::CONTENT_TYPE);
        if !has_content_type && matches!(self.body, BodyKind::Json(_)) {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
        }

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        let body = match self.body {
            BodyKind::Empty => Bytes::new(),
            BodyKind::Bytes(b) | BodyKind::Json(b) => b,
        };
        let request = builder.body(Full::new(body))?;

        tracing::trace!(method = %self.method, url = %self.url, "sending request");
        let inner = self.service.oneshot(request).await?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
