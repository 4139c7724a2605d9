#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Typed client for the Contentful Content Management API.
//!
//! Covers assets, entries, content types and uploads of a space:
//! - listing through lazy [`Collection`]s
//! - fetching single items
//! - create/update, delete, publish, unpublish and asset processing, each
//!   stamped with the entity's `X-Contentful-Version`
//!
//! Assets are flattened to a single locale in memory; see [`asset`] for how
//! that maps to the server's per-locale fields.
//!
//! Every call is one request (two for [`EntriesService::get_entry_key`]).
//! Nothing is cached and nothing is retried: a version conflict comes back
//! as [`ContentfulError::VersionConflict`] and the caller decides what to do.
//!
//! ```ignore
//! use contentful_management::{Asset, Client, Resource, UploadFrom, Versioned};
//!
//! let client = Client::builder("CFPAT-...").default_locale("en-US").build()?;
//!
//! let mut upload = Resource::from_path("cat.png");
//! client.resources().upsert("space-id", &mut upload).await?;
//!
//! let mut asset = Asset::new("en-US");
//! asset.fields.title = "Cat".into();
//! asset.fields.file.upload_from = upload.id().map(UploadFrom::resource);
//! client.assets().upsert("space-id", &mut asset).await?;
//! client.assets().process("space-id", &asset).await?;
//! ```

pub mod asset;
mod client;
pub mod collection;
pub mod config;
pub mod content_type;
pub mod entry;
pub mod error;
pub mod locale;
mod request;
pub mod resource;
pub mod sys;

pub use asset::{Asset, AssetFields, AssetSeed, AssetsService, File, FileDetail, FileImage, UploadFrom};
pub use client::{Client, ClientBuilder};
pub use collection::{Collection, CollectionPage, Query};
pub use config::ClientConfig;
pub use content_type::{ContentType, ContentTypeField, ContentTypesService};
pub use entry::{EntriesService, Entry, EntryField};
pub use error::{ApiError, ContentfulError};
pub use locale::{DEFAULT_LOCALE, Locale, LocalizedText};
pub use resource::{Resource, ResourcesService};
pub use sys::{Link, LinkSys, Sys, Versioned};

pub use contentful_http::{AccessToken, HttpError, StatusCode};
