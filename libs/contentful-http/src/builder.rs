use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::layers::DefaultHeadersLayer;
use crate::response::ResponseBody;
use crate::token::AccessToken;

/// Builder for [`HttpClient`](crate::HttpClient).
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Bearer token sent as `Authorization` on every request.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.config.access_token = Some(token);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Accept `http://` URLs. Only for tests against local mock servers.
    #[must_use]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    /// Assemble the client.
    ///
    /// Request flow (outer to inner):
    /// `Timeout -> DefaultHeaders -> Decompression -> hyper`.
    /// There is no retry layer: every failure goes straight back to the caller.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Tls` if the TLS connector cannot be built, or
    /// `HttpError::InvalidHeaderValue` for a bad user agent or token.
    pub fn build(self) -> Result<crate::HttpClient, HttpError> {
        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 use only for testing with mock servers"
            );
        }

        let timeout = self.config.request_timeout;
        let https = build_https_connector(self.config.transport)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        // pool_idle_timeout only takes effect with a timer installed
        client_builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);
        if let Some(idle_timeout) = self.config.pool_idle_timeout {
            client_builder.pool_idle_timeout(idle_timeout);
        }
        let hyper_client = client_builder.build::<_, Full<Bytes>>(https);

        let mut defaults = vec![(
            http::header::USER_AGENT,
            http::HeaderValue::from_str(&self.config.user_agent)?,
        )];
        if let Some(token) = &self.config.access_token {
            defaults.push((http::header::AUTHORIZATION, token.bearer_header()?));
        }

        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(DefaultHeadersLayer::new(defaults))
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        Ok(crate::HttpClient {
            service: BoxCloneSyncService::new(service),
            max_body_size: self.config.max_body_size,
            transport_security: self.config.transport,
        })
    }
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }

    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(other) => HttpError::Transport(other),
    }
}

/// Erase the decompression body into [`ResponseBody`].
fn box_response_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    let boxed: ResponseBody = body.map_err(Into::into).boxed();
    Response::from_parts(parts, boxed)
}

/// Connector trusting Mozilla's root set (webpki-roots), no OS dependency.
fn build_https_connector(
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let provider = rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

    let builder = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(provider)
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => {
            builder.https_or_http().enable_all_versions().build()
        }
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions().build(),
    };
    Ok(connector)
}
