use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::Client;
use crate::collection::Collection;
use crate::error::ContentfulError;
use crate::request::ApiRequest;
use crate::sys::{Sys, Versioned};

/// Schema of a kind of entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<Sys>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<ContentTypeField>,
}

impl Versioned for ContentType {
    fn sys(&self) -> Option<&Sys> {
        self.sys.as_ref()
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeField {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub omitted: bool,
    /// Element definition of `Array` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct ContentTypesService<'a> {
    client: &'a Client,
}

impl<'a> ContentTypesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str) -> Collection {
        Collection::new(self.client, ApiRequest::get(space_id, &["content_types"]))
    }

    /// # Errors
    ///
    /// Transport, API or decode failure.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        space_id: &str,
        content_type_id: &str,
    ) -> Result<ContentType, ContentfulError> {
        let body = self
            .client
            .execute(ApiRequest::get(space_id, &["content_types", content_type_id]))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_field_definitions() {
        let ct: ContentType = serde_json::from_value(json!({
            "sys": {"id": "post", "version": 2},
            "name": "Blog post",
            "displayField": "title",
            "fields": [
                {"id": "title", "name": "Title", "type": "Symbol", "localized": true, "required": true},
                {"id": "tags", "name": "Tags", "type": "Array", "items": {"type": "Symbol"}},
                {"id": "author", "name": "Author", "type": "Link", "linkType": "Entry"}
            ]
        }))
        .unwrap();

        assert_eq!(ct.id(), Some("post"));
        assert_eq!(ct.display_field.as_deref(), Some("title"));
        assert_eq!(ct.fields.len(), 3);
        assert!(ct.fields[0].localized && ct.fields[0].required);
        assert_eq!(ct.fields[1].items, Some(json!({"type": "Symbol"})));
        assert_eq!(ct.fields[2].link_type.as_deref(), Some("Entry"));
    }
}
