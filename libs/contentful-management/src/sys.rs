//! Server-assigned metadata shared by every entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The `sys` envelope.
///
/// Opaque to the client: it is only ever populated from server responses
/// and echoed back. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub first_published_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_counter: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_by: Option<Link>,
}

impl Sys {
    /// Metadata carrying only an id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Reference to another entity: `{"sys": {"type": "Link", "linkType": .., "id": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(rename = "type", default = "LinkSys::link_kind")]
    pub kind: String,
    #[serde(default)]
    pub link_type: String,
    pub id: String,
}

impl LinkSys {
    fn link_kind() -> String {
        "Link".to_owned()
    }
}

impl Link {
    #[must_use]
    pub fn new(link_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                kind: LinkSys::link_kind(),
                link_type: link_type.into(),
                id: id.into(),
            },
        }
    }

    #[must_use]
    pub fn upload(id: impl Into<String>) -> Self {
        Self::new("Upload", id)
    }

    #[must_use]
    pub fn space(id: impl Into<String>) -> Self {
        Self::new("Space", id)
    }

    #[must_use]
    pub fn content_type(id: impl Into<String>) -> Self {
        Self::new("ContentType", id)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

/// Entities stamped with an optimistic-concurrency version.
pub trait Versioned {
    fn sys(&self) -> Option<&Sys>;

    /// Version sent as `X-Contentful-Version`; 1 until the server has
    /// reported one.
    fn version(&self) -> u64 {
        self.sys().and_then(|sys| sys.version).unwrap_or(1)
    }

    /// `sys.id`, if the server has assigned one.
    fn id(&self) -> Option<&str> {
        self.sys().and_then(|sys| sys.id.as_deref())
    }
}
