//! Assets: binary files with a localized title and description.
//!
//! On the wire `title`, `description` and `file` are locale maps. An
//! [`Asset`] in memory holds the values of one locale, its `locale`:
//! serialization folds them back into single-entry maps and decoding picks
//! that locale's entries out.

use std::collections::BTreeMap;

use serde::de::{DeserializeSeed, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::instrument;

use crate::client::Client;
use crate::collection::Collection;
use crate::error::ContentfulError;
use crate::locale::{Locale, LocalizedText, localize, resolve_localized};
use crate::request::ApiRequest;
use crate::sys::{Link, LinkSys, Sys, Versioned};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    /// Locale the fields below belong to.
    pub locale: Locale,
    pub sys: Option<Sys>,
    pub fields: AssetFields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFields {
    pub title: String,
    pub description: String,
    pub file: File,
}

/// A stored binary. Everything is optional and left out of the JSON when
/// unset; `details` only appears once the server has processed the upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Remote URL the server fetches the binary from during processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FileDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_from: Option<UploadFrom>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FileImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Link to an upload [`Resource`](crate::Resource) the file is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFrom {
    pub sys: LinkSys,
}

impl UploadFrom {
    #[must_use]
    pub fn resource(upload_id: impl Into<String>) -> Self {
        Self {
            sys: Link::upload(upload_id).sys,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

impl Asset {
    /// Empty asset whose fields will be written under `locale`.
    #[must_use]
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Decode a response body, resolving fields for `locale`.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Decode` for malformed JSON or a locale map of the
    /// wrong shape.
    pub fn from_json(bytes: &[u8], locale: impl Into<Locale>) -> Result<Self, ContentfulError> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        let asset = AssetSeed::new(locale.into()).deserialize(&mut de)?;
        de.end()?;
        Ok(asset)
    }
}

impl Versioned for Asset {
    fn sys(&self) -> Option<&Sys> {
        self.sys.as_ref()
    }
}

#[derive(Serialize)]
struct WireOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sys: Option<&'a Sys>,
    fields: WireFieldsOut<'a>,
}

#[derive(Serialize)]
struct WireFieldsOut<'a> {
    title: BTreeMap<&'a str, &'a str>,
    description: BTreeMap<&'a str, &'a str>,
    file: BTreeMap<&'a str, &'a File>,
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireOut {
            sys: self.sys.as_ref(),
            fields: WireFieldsOut {
                title: localize(&self.locale, self.fields.title.as_str()),
                description: localize(&self.locale, self.fields.description.as_str()),
                file: localize(&self.locale, &self.fields.file),
            },
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct WireIn {
    #[serde(default)]
    sys: Option<Sys>,
    #[serde(default)]
    fields: Option<WireFieldsIn>,
}

#[derive(Deserialize)]
struct WireFieldsIn {
    #[serde(default)]
    title: Option<LocalizedText>,
    #[serde(default)]
    description: Option<LocalizedText>,
    #[serde(default)]
    file: Option<BTreeMap<String, Value>>,
}

/// Decodes an [`Asset`] for a chosen locale.
///
/// ```ignore
/// use serde::de::DeserializeSeed;
///
/// let mut de = serde_json::Deserializer::from_str(body);
/// let asset = AssetSeed::new("fr".into()).deserialize(&mut de)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetSeed {
    locale: Locale,
}

impl AssetSeed {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl<'de> DeserializeSeed<'de> for AssetSeed {
    type Value = Asset;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Asset, D::Error> {
        let wire = WireIn::deserialize(deserializer)?;

        let fields = match wire.fields {
            None => AssetFields::default(),
            Some(fields) => AssetFields {
                title: resolve_text::<D::Error>(fields.title, &self.locale)?,
                description: resolve_text::<D::Error>(fields.description, &self.locale)?,
                file: match fields.file {
                    None => File::default(),
                    Some(map) => resolve_localized::<File, D::Error>(map, &self.locale)?,
                },
            },
        };

        Ok(Asset {
            locale: self.locale,
            sys: wire.sys,
            fields,
        })
    }
}

fn resolve_text<E: serde::de::Error>(
    text: Option<LocalizedText>,
    locale: &Locale,
) -> Result<String, E> {
    text.map_or_else(|| Ok(String::new()), |text| text.resolve(locale))
}

/// Decodes with the default locale (`en`). Use [`AssetSeed`] or
/// [`Asset::from_json`] to pick another.
impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        AssetSeed::default().deserialize(deserializer)
    }
}

/// Asset endpoints of one client.
#[derive(Debug, Clone, Copy)]
pub struct AssetsService<'a> {
    client: &'a Client,
}

impl<'a> AssetsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All assets of a space. Nothing is fetched until the collection is
    /// advanced.
    pub fn list(&self, space_id: &str) -> Collection {
        Collection::new(self.client, ApiRequest::get(space_id, &["assets"]))
    }

    /// # Errors
    ///
    /// Transport, API or decode failure.
    pub async fn get(&self, space_id: &str, asset_id: &str) -> Result<Asset, ContentfulError> {
        self.get_localized(space_id, asset_id, self.client.default_locale().clone())
            .await
    }

    /// Fetch an asset resolving its fields for `locale`.
    ///
    /// # Errors
    ///
    /// Transport, API or decode failure.
    #[instrument(skip(self, locale), fields(locale = %locale))]
    pub async fn get_localized(
        &self,
        space_id: &str,
        asset_id: &str,
        locale: Locale,
    ) -> Result<Asset, ContentfulError> {
        let body = self
            .client
            .execute(ApiRequest::get(space_id, &["assets", asset_id]))
            .await?;
        Asset::from_json(&body, locale)
    }

    /// Create or update an asset.
    ///
    /// An asset the server already knows (it has `sys.createdAt`) is sent
    /// with `PUT /assets/{id}`; anything else is created with `POST`. The
    /// asset is replaced by the server's copy, keeping its locale.
    ///
    /// # Errors
    ///
    /// `ContentfulError::VersionConflict` when the asset changed on the
    /// server since it was read; otherwise transport, API or decode failure.
    #[instrument(skip(self, asset), fields(asset_id = ?asset.id(), version = asset.version()))]
    pub async fn upsert(&self, space_id: &str, asset: &mut Asset) -> Result<(), ContentfulError> {
        let existing = asset.sys.as_ref().filter(|sys| sys.created_at.is_some());
        let request = match existing {
            Some(sys) => {
                let id = sys
                    .id
                    .as_deref()
                    .ok_or_else(|| ContentfulError::missing_sys("asset", "id"))?;
                ApiRequest::put(space_id, &["assets", id])
            }
            None => ApiRequest::post(space_id, &["assets"]),
        };
        let request = request.version(asset.version()).json(&*asset)?;

        let body = self.client.execute(request).await?;
        *asset = Asset::from_json(&body, asset.locale.clone())?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` for an asset without an id, otherwise
    /// transport or API failure.
    #[instrument(skip(self, asset), fields(asset_id = ?asset.id(), version = asset.version()))]
    pub async fn delete(&self, space_id: &str, asset: &Asset) -> Result<(), ContentfulError> {
        let id = require_id(asset)?;
        self.client
            .execute(ApiRequest::delete(space_id, &["assets", id]).version(asset.version()))
            .await?;
        Ok(())
    }

    /// Ask the server to process the file of the asset's locale. Processing
    /// runs asynchronously; fetch the asset again to see the resulting
    /// `url` and `details`.
    ///
    /// # Errors
    ///
    /// `ContentfulError::MissingSys` for an asset without an id, otherwise
    /// transport or API failure.
    #[instrument(skip(self, asset), fields(asset_id = ?asset.id(), locale = %asset.locale))]
    pub async fn process(&self, space_id: &str, asset: &Asset) -> Result<(), ContentfulError> {
        let id = require_id(asset)?;
        let request = ApiRequest::put(
            space_id,
            &["assets", id, "files", asset.locale.as_str(), "process"],
        )
        .version(asset.version());
        self.client.execute(request).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` for an asset without an id, otherwise
    /// transport, API or decode failure.
    #[instrument(skip(self, asset), fields(asset_id = ?asset.id(), version = asset.version()))]
    pub async fn publish(&self, space_id: &str, asset: &mut Asset) -> Result<(), ContentfulError> {
        let id = require_id(asset)?;
        let request = ApiRequest::put(space_id, &["assets", id, "published"]).version(asset.version());
        let body = self.client.execute(request).await?;
        *asset = Asset::from_json(&body, asset.locale.clone())?;
        Ok(())
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` for an asset without an id, otherwise
    /// transport, API or decode failure.
    #[instrument(skip(self, asset), fields(asset_id = ?asset.id(), version = asset.version()))]
    pub async fn unpublish(&self, space_id: &str, asset: &mut Asset) -> Result<(), ContentfulError> {
        let id = require_id(asset)?;
        let request =
            ApiRequest::delete(space_id, &["assets", id, "published"]).version(asset.version());
        let body = self.client.execute(request).await?;
        *asset = Asset::from_json(&body, asset.locale.clone())?;
        Ok(())
    }
}

fn require_id(asset: &Asset) -> Result<&str, ContentfulError> {
    asset
        .id()
        .ok_or_else(|| ContentfulError::missing_sys("asset", "id"))
}
