use std::time::Duration;

use bytes::Bytes;
use contentful_http::{AccessToken, HttpClient};
use url::Url;

use crate::asset::AssetsService;
use crate::config::ClientConfig;
use crate::content_type::ContentTypesService;
use crate::entry::EntriesService;
use crate::error::ContentfulError;
use crate::locale::Locale;
use crate::request::{ApiRequest, Host, MANAGEMENT_JSON, OCTET_STREAM, Payload};
use crate::resource::ResourcesService;

const DEFAULT_USER_AGENT: &str = concat!("contentful-management/", env!("CARGO_PKG_VERSION"));

/// Content Management API client.
///
/// Cheap to clone; clones share the connection pool.
///
/// ```ignore
/// use contentful_management::{Client, ClientConfig};
///
/// let client = Client::new(ClientConfig::from_env()?)?;
/// let mut asset = client.assets().get("space-id", "asset-id").await?;
/// asset.fields.title = "New title".into();
/// client.assets().upsert("space-id", &mut asset).await?;
/// client.assets().publish("space-id", &mut asset).await?;
/// ```
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
    upload_url: Url,
    default_locale: Locale,
}

impl Client {
    /// # Errors
    ///
    /// `ContentfulError::Config` for an invalid configuration, or
    /// `ContentfulError::Transport` if the HTTP stack cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ContentfulError> {
        config.validate()?;

        let mut http = HttpClient::builder()
            .access_token(config.access_token.clone())
            .timeout(config.timeout)
            .user_agent(
                config
                    .user_agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            );
        if config.allow_insecure_http {
            http = http.allow_insecure_http();
        }

        Ok(Self {
            http: http.build()?,
            base_url: config.base_url,
            upload_url: config.upload_url,
            default_locale: config.default_locale,
        })
    }

    pub fn builder(access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            config: ClientConfig::new(access_token),
        }
    }

    #[must_use]
    pub fn assets(&self) -> AssetsService<'_> {
        AssetsService::new(self)
    }

    #[must_use]
    pub fn entries(&self) -> EntriesService<'_> {
        EntriesService::new(self)
    }

    #[must_use]
    pub fn resources(&self) -> ResourcesService<'_> {
        ResourcesService::new(self)
    }

    #[must_use]
    pub fn content_types(&self) -> ContentTypesService<'_> {
        ContentTypesService::new(self)
    }

    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    /// Send one request and return the body of a 2xx response.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Bytes, ContentfulError> {
        let url = self.url_for(&request)?;
        let method = request.method.clone();

        let mut builder = self.http.request(method.clone(), url.as_str());
        let content_type = match &request.payload {
            Payload::Json(_) => Some(MANAGEMENT_JSON),
            Payload::Binary(_) => Some(OCTET_STREAM),
            Payload::Empty => None,
        };
        if let Some(content_type) = content_type
            && !request.has_header("content-type")
        {
            builder = builder.header("content-type", content_type);
        }
        builder = builder.headers(request.headers.iter().map(|(n, v)| (*n, v.as_str())));
        builder = match request.payload {
            Payload::Json(body) | Payload::Binary(body) => builder.body_bytes(body),
            Payload::Empty => builder,
        };

        tracing::debug!(%method, path = url.path(), "contentful request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path = url.path(), error = %e, "contentful request failed");
            ContentfulError::from(e)
        })?;

        let status = response.status();
        match response.checked_bytes().await {
            Ok(body) => {
                tracing::debug!(%method, path = url.path(), status = status.as_u16(), "contentful response");
                Ok(body)
            }
            Err(e) => {
                let err = ContentfulError::from(e);
                tracing::warn!(%method, path = url.path(), status = status.as_u16(), error = %err, "contentful call rejected");
                Err(err)
            }
        }
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ContentfulError> {
        let mut url = match request.host {
            Host::Api => self.base_url.clone(),
            Host::Upload => self.upload_url.clone(),
        };

        url.path_segments_mut()
            .map_err(|()| ContentfulError::Config("endpoint URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("upload_url", &self.upload_url.as_str())
            .field("default_locale", &self.default_locale)
            .finish_non_exhaustive()
    }
}

/// Shortcut for building a [`Client`] without a config file.
#[derive(Debug)]
#[must_use]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn base_url(mut self, url: Url) -> Self {
        self.config.base_url = url;
        self
    }

    pub fn upload_url(mut self, url: Url) -> Self {
        self.config.upload_url = url;
        self
    }

    pub fn default_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.config.default_locale = locale.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = AccessToken::new(token.into());
        self
    }

    /// Accept `http://` endpoints. Only for tests against local mock servers.
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.allow_insecure_http = true;
        self
    }

    /// # Errors
    ///
    /// Same as [`Client::new`].
    pub fn build(self) -> Result<Client, ContentfulError> {
        Client::new(self.config)
    }
}
