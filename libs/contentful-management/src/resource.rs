//! Uploads: raw binary slots an asset file can be created from.
//!
//! Upload endpoints live on the separate upload host. The whole payload is
//! read into memory before it is sent.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::instrument;

use crate::client::Client;
use crate::collection::Collection;
use crate::error::ContentfulError;
use crate::request::ApiRequest;
use crate::sys::{Sys, Versioned};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<Sys>,
    /// Local file sent by [`ResourcesService::upsert`]; never serialized.
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl Resource {
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            sys: None,
            file_path: Some(path.into()),
        }
    }

    /// Replace metadata with the server's copy, keeping the local path.
    fn refresh(&mut self, bytes: &[u8]) -> Result<(), ContentfulError> {
        let fresh: Self = serde_json::from_slice(bytes)?;
        self.sys = fresh.sys;
        Ok(())
    }
}

impl Versioned for Resource {
    fn sys(&self) -> Option<&Sys> {
        self.sys.as_ref()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourcesService<'a> {
    client: &'a Client,
}

impl<'a> ResourcesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str) -> Collection {
        Collection::new(
            self.client,
            ApiRequest::get(space_id, &["uploads"]).upload_host(),
        )
    }

    /// # Errors
    ///
    /// Transport, API or decode failure.
    #[instrument(skip(self))]
    pub async fn get(&self, space_id: &str, resource_id: &str) -> Result<Resource, ContentfulError> {
        let request = ApiRequest::get(space_id, &["uploads", resource_id]).upload_host();
        let body = self.client.execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Upload the file at `resource.file_path`.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Io` when there is no path or the file cannot be
    /// read; otherwise transport, API or decode failure.
    #[instrument(skip(self, resource), fields(path = ?resource.file_path))]
    pub async fn upsert(&self, space_id: &str, resource: &mut Resource) -> Result<(), ContentfulError> {
        let path = resource.file_path.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "resource has no file_path")
        })?;
        let payload = tokio::fs::read(path).await?;
        self.send(space_id, resource, payload).await
    }

    /// Upload everything `reader` yields.
    ///
    /// # Errors
    ///
    /// `ContentfulError::Io` if reading fails; otherwise transport, API or
    /// decode failure.
    #[instrument(skip(self, resource, reader))]
    pub async fn upsert_stream<R>(
        &self,
        space_id: &str,
        resource: &mut Resource,
        mut reader: R,
    ) -> Result<(), ContentfulError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload).await?;
        self.send(space_id, resource, payload).await
    }

    async fn send(
        &self,
        space_id: &str,
        resource: &mut Resource,
        payload: Vec<u8>,
    ) -> Result<(), ContentfulError> {
        tracing::debug!(bytes = payload.len(), "uploading");
        let request = ApiRequest::post(space_id, &["uploads"])
            .upload_host()
            .binary(payload);
        let body = self.client.execute(request).await?;
        resource.refresh(&body)
    }

    /// # Errors
    ///
    /// `ContentfulError::MissingSys` without an id, otherwise transport or
    /// API failure.
    #[instrument(skip(self, resource), fields(resource_id = ?resource.id()))]
    pub async fn delete(&self, space_id: &str, resource: &Resource) -> Result<(), ContentfulError> {
        let id = resource
            .id()
            .ok_or_else(|| ContentfulError::missing_sys("upload", "id"))?;
        let request = ApiRequest::delete(space_id, &["uploads", id])
            .upload_host()
            .version(resource.version());
        self.client.execute(request).await?;
        Ok(())
    }
}
