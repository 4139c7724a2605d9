#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the Contentful management SDK
//!
//! A hyper-based client with:
//! - TLS via rustls and the webpki root set (HTTPS only by default)
//! - Connection pooling
//! - Per-request timeout
//! - Default `User-Agent` and bearer `Authorization` headers
//! - Transparent response decompression with a body size limit
//!
//! There is no retry layer; a failed call is reported once.
//!
//! # Example
//!
//! ```ignore
//! use contentful_http::{AccessToken, HttpClient};
//!
//! let client = HttpClient::builder()
//!     .access_token(AccessToken::new("CFPAT-..."))
//!     .build()?;
//!
//! let space: serde_json::Value = client
//!     .get("https://api.contentful.com/spaces/abc")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod token;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{DefaultHeadersLayer, DefaultHeadersService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
pub use token::AccessToken;

// Re-exported so SDK callers can match on status codes and methods.
pub use http::{Method, StatusCode};
