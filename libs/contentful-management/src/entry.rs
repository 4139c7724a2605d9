use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::Client;
use crate::collection::{Collection, Query};
use crate::error::ContentfulError;
use crate::locale::Locale;
use crate::request::{ApiRequest, CONTENT_TYPE_HEADER};
use crate::sys::{Link, Sys, Versioned};

/// A content item. `fields` is kept exactly as the server sends it: each
/// value is a locale map such as `{"en": "Hello"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Locale used by [`Entry::localized`]; never sent.
    #[serde(skip)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<Sys>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Entry {
    #[must_use]
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Raw (per-locale) value of a field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Value of a field for the entry's locale.
    #[must_use]
    pub fn localized(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)?.get(self.locale.as_str())
    }

    /// Set a field's value for the entry's locale, keeping other locales.
    pub fn set_localized(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let slot = self
            .fields
            .entry(key.into())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(self.locale.as_str().to_owned(), value.into());
        }
    }

    fn content_type_id(&self) -> Option<&str> {
        self.sys
            .as_ref()
            .and_then(|sys| sys.content_type.as_ref())
            .map(Link::id)
    }

    fn space_id(&self) -> Option<&str> {
        self.sys
            .as_ref()
            .and_then(|sys| sys.space.as_ref())
            .map(Link::id)
    }

    fn decode(bytes: &[u8], locale: Locale) -> Result<Self, ContentfulError> {
        let mut entry: Self = serde_json::from_slice(bytes)?;
        entry.locale = locale;
        Ok(entry)
    }
}

impl Versioned for Entry {
    fn sys(&self) -> Option<&Sys> {
        self.sys.as_ref()
    }
}

/// A field value paired with the type its content type declares for it.
///
/// `data_type` is `None` when the content type has no definition for the
/// field; the value is still returned as is.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryField {
    pub value: Value,
    /// e.g. `Symbol`, `Text`, `Integer`, `Link`, `Array`.
    pub data_type: Option<String>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    fields: &'a Map<String, Value>,
}

/// Entry endpoints of one client.
#[derive(Debug, Clone, Copy)]
pub struct EntriesService<'a> {
    client: &'a Client,
}

impl<'a> EntriesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str) -> Collection {
        Collection::new(self.client, ApiRequest::get(space_id, &["entries"]))
    }

    /// Entries matching search parameters, e.g.
    /// `Query::new().param("content_type", "post")`.
    pub fn list_with_query(&self, space_id: &str, query: Query) -> Collection {
        self.list(space_id).with_query(query)
    }

    /// # Errors
    ///
    /// Transport, API or decode failure.
    #[instrument(skip(self))]
    pub async fn get(&self, space_id: &str, entry_id: &str) -> Result<Entry, ContentfulError> {
        let body = self
            .client
            .execute(ApiRequest::get(space_id, &["entries", entry_id]))
            .await?;
        Entry::decode(&body, self.client.default_locale().clone())
    }

    /// First entry matching search parameters, e.g.
    /// `Query::new().param("fields.slug", "hello-world")`.
    ///
    /// Only one item is requested; `limit` and `skip` of `query` are
    /// overridden.
    ///
    /// # Errors
    ///
    /// Transport, API or decode failure.
    #[instrument(skip(self, query))]
    pub async fn get_with_query(
        &self,
        space_id: &str,
        query: Query,
    ) -> Result<Option<Entry>, ContentfulError> {
        let mut entries = self.list_with_query(space_id, query.limit(1).skip(0));
        let Some(page) = entries.next().await? else {
            return Ok(None);
        };
        Ok(page.to_entries()?.into_iter().next())
    }

    /// Save the entry's fields.
    ///
    /// Only `fields` is sent; id, content type and version travel in the
    /// path and headers. The entry is replaced by the server's copy.
    ///
    /// # Errors
    ///
    /// `ContentfulError::MissingSys` without an id or content type link,
    /// `ContentfulError::VersionConflict` on a stale version, otherwise
    /// transport, API or decode failure.
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id(), version = entry.version()))]
    pub async fn update(&self, space_id: &str, entry: &mut Entry) -> Result<(), ContentfulError> {
        let id = require_id(entry)?;
        let content_type = entry
            .content_type_id()
            .ok_or_else(|| ContentfulError::missing_sys("entry", "contentType"))?;

        let request = ApiRequest::put(space_id, &["entries", id])
            .header(CONTENT_TYPE_HEADER, content_type)
            .version(entry.version())
            .json(&UpdateBody {
                fields: &entry.fields,
            })?;

        let body = self.client.execute(request).await?;
        *entry = Entry::decode(&body, entry.locale.clone())?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` without an id, otherwise transport or
    /// API failure.
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id(), version = entry.version()))]
    pub async fn delete(&self, space_id: &str, entry: &Entry) -> Result<(), ContentfulError> {
        let id = require_id(entry)?;
        self.client
            .execute(ApiRequest::delete(space_id, &["entries", id]).version(entry.version()))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` without an id, otherwise transport, API
    /// or decode failure.
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id(), version = entry.version()))]
    pub async fn publish(&self, space_id: &str, entry: &mut Entry) -> Result<(), ContentfulError> {
        let id = require_id(entry)?;
        let request = ApiRequest::put(space_id, &["entries", id, "published"]).version(entry.version());
        let body = self.client.execute(request).await?;
        *entry = Entry::decode(&body, entry.locale.clone())?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` without an id, otherwise transport, API
    /// or decode failure.
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id(), version = entry.version()))]
    pub async fn unpublish(&self, space_id: &str, entry: &mut Entry) -> Result<(), ContentfulError> {
        let id = require_id(entry)?;
        let request =
            ApiRequest::delete(space_id, &["entries", id, "published"]).version(entry.version());
        let body = self.client.execute(request).await?;
        *entry = Entry::decode(&body, entry.locale.clone())?;
        Ok(())
    }

    /// Pair a field's raw value with its declared type.
    ///
    /// Reads the first page of the space's content types on every call.
    /// A field the content type does not define yields `data_type: None`.
    ///
    /// # Errors
    ///
    /// `ContentfulError::MissingSys` when the entry has no space or content
    /// type link; any failure of the content type request.
    #[instrument(skip(self, entry), fields(entry_id = ?entry.id()))]
    pub async fn get_entry_key(&self, entry: &Entry, key: &str) -> Result<EntryField, ContentfulError> {
        let space_id = entry
            .space_id()
            .ok_or_else(|| ContentfulError::missing_sys("entry", "space"))?;
        let content_type_id = entry
            .content_type_id()
            .ok_or_else(|| ContentfulError::missing_sys("entry", "contentType"))?;

        let mut content_types = self.client.content_types().list(space_id);
        let page = content_types.next().await?;
        let definitions = match page {
            Some(page) => page.to_content_types()?,
            None => Vec::new(),
        };

        let data_type = definitions
            .iter()
            .filter(|ct| ct.id() == Some(content_type_id))
            .flat_map(|ct| ct.fields.iter())
            .find(|field| field.id == key)
            .map(|field| field.kind.clone());

        if data_type.is_none() {
            tracing::debug!(content_type_id, key, "no field definition found");
        }

        Ok(EntryField {
            value: entry.field(key).cloned().unwrap_or(Value::Null),
            data_type,
        })
    }
}

fn require_id(entry: &Entry) -> Result<&str, ContentfulError> {
    entry
        .id()
        .ok_or_else(|| ContentfulError::missing_sys("entry", "id"))
}
