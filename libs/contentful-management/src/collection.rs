//! Lazy, skip/limit pagination over list endpoints.
//!
//! A [`Collection`] holds a prepared `GET` and nothing else; the first
//! request goes out when [`Collection::next`] is awaited. Each page advances
//! `skip` by the number of items it carried.
//!
//! ```ignore
//! let mut assets = client.assets().list("space-id");
//! while let Some(page) = assets.next().await? {
//!     for asset in page.to_assets()? {
//!         println!("{}", asset.fields.title);
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use futures::{Stream, TryStreamExt, stream};
use serde::Deserialize;
use serde::de::{DeserializeOwned, DeserializeSeed};
use serde_json::Value;

use crate::asset::{Asset, AssetSeed};
use crate::client::Client;
use crate::content_type::ContentType;
use crate::entry::Entry;
use crate::error::ContentfulError;
use crate::locale::Locale;
use crate::request::ApiRequest;
use crate::resource::Resource;
use crate::sys::Sys;

/// Page size used when the caller does not set one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Query parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub limit: u32,
    pub skip: u64,
    pub order: Option<String>,
    /// Any other search parameter, e.g. `content_type` or `fields.slug`.
    pub params: BTreeMap<String, String>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
            order: None,
            params: BTreeMap::new(),
        }
    }
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_owned(), self.limit.to_string()),
            ("skip".to_owned(), self.skip.to_string()),
        ];
        if let Some(order) = &self.order {
            pairs.push(("order".to_owned(), order.clone()));
        }
        pairs.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |query, (k, v)| query.param(k, v))
    }
}

/// One decoded list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(skip)]
    locale: Locale,
}

impl CollectionPage {
    /// Items as assets, resolved for the collection's locale.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Decode` if an item is not a well-formed asset.
    pub fn to_assets(&self) -> Result<Vec<Asset>, ContentfulError> {
        self.items
            .iter()
            .map(|item| {
                AssetSeed::new(self.locale.clone())
                    .deserialize(item)
                    .map_err(ContentfulError::from)
            })
            .collect()
    }

    /// Items as entries carrying the collection's locale.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Decode` if an item is not a well-formed entry.
    pub fn to_entries(&self) -> Result<Vec<Entry>, ContentfulError> {
        let mut entries: Vec<Entry> = self.decode_items()?;
        for entry in &mut entries {
            entry.locale = self.locale.clone();
        }
        Ok(entries)
    }

    /// # Errors
    ///
    /// `ContentfulError::Decode` if an item is not a well-formed content type.
    pub fn to_content_types(&self) -> Result<Vec<ContentType>, ContentfulError> {
        self.decode_items()
    }

    /// # Errors
    ///
    /// `ContentfulError::Decode` if an item is not a well-formed upload.
    pub fn to_resources(&self) -> Result<Vec<Resource>, ContentfulError> {
        self.decode_items()
    }

    fn decode_items<T: DeserializeOwned>(&self) -> Result<Vec<T>, ContentfulError> {
        self.items
            .iter()
            .map(|item| T::deserialize(item).map_err(ContentfulError::from))
            .collect()
    }
}

/// Cursor over a list endpoint.
#[derive(Debug, Clone)]
#[must_use = "a Collection issues no request until next() is awaited"]
pub struct Collection {
    client: Client,
    request: ApiRequest,
    query: Query,
    locale: Locale,
    exhausted: bool,
}

impl Collection {
    pub(crate) fn new(client: &Client, request: ApiRequest) -> Self {
        Self {
            locale: client.default_locale().clone(),
            client: client.clone(),
            request,
            query: Query::default(),
            exhausted: false,
        }
    }

    /// Replace the query; `skip` in it becomes the starting offset.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Locale used by [`CollectionPage::to_assets`] and
    /// [`CollectionPage::to_entries`].
    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Fetch the page at the current offset.
    ///
    /// Returns `Ok(None)` once the previous page reached `total` or the
    /// server returned an empty page. An error leaves the offset unchanged,
    /// so calling again re-issues the same request.
    ///
    /// # Errors
    ///
    /// Any transport, API or decode failure of the underlying `GET`.
    pub async fn next(&mut self) -> Result<Option<CollectionPage>, ContentfulError> {
        if self.exhausted {
            return Ok(None);
        }

        let request = self.request.clone().query(self.query.to_pairs());
        let body = self.client.execute(request).await?;
        let mut page: CollectionPage = serde_json::from_slice(&body)?;
        page.locale = self.locale.clone();

        if page.items.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        self.query.skip += page.items.len() as u64;
        if self.query.skip >= page.total {
            self.exhausted = true;
        }
        tracing::trace!(skip = self.query.skip, total = page.total, "collection advanced");
        Ok(Some(page))
    }

    /// Raw items of this and every following page.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value, ContentfulError>> {
        stream::try_unfold(self, |mut collection| async move {
            let page = collection.next().await?;
            Ok::<_, ContentfulError>(page.map(|page| (page, collection)))
        })
        .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<_, ContentfulError>)))
        .try_flatten()
    }
}
