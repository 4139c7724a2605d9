use bytes::Bytes;
use contentful_http::Method;
use serde::Serialize;

use crate::error::ContentfulError;

pub const MANAGEMENT_JSON: &str = "application/vnd.contentful.management.v1+json";
pub const OCTET_STREAM: &str = "application/octet-stream";
pub const VERSION_HEADER: &str = "X-Contentful-Version";
pub const CONTENT_TYPE_HEADER: &str = "X-Contentful-Content-Type";

/// Which configured endpoint a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Api,
    Upload,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Bytes),
    Binary(Bytes),
}

/// One space-scoped call: `(method, path, query, headers, body, host)`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) host: Host,
    /// Path segments after the base URL, unescaped.
    pub(crate) segments: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(&'static str, String)>,
    pub(crate) payload: Payload,
}

impl ApiRequest {
    /// Request for `/spaces/{space_id}/{segments...}`.
    pub(crate) fn new(method: Method, space_id: &str, segments: &[&str]) -> Self {
        let mut path = Vec::with_capacity(segments.len() + 2);
        path.push("spaces".to_owned());
        path.push(space_id.to_owned());
        path.extend(segments.iter().map(|s| (*s).to_owned()));

        Self {
            method,
            host: Host::Api,
            segments: path,
            query: Vec::new(),
            headers: Vec::new(),
            payload: Payload::Empty,
        }
    }

    pub(crate) fn get(space_id: &str, segments: &[&str]) -> Self {
        Self::new(Method::GET, space_id, segments)
    }

    pub(crate) fn post(space_id: &str, segments: &[&str]) -> Self {
        Self::new(Method::POST, space_id, segments)
    }

    pub(crate) fn put(space_id: &str, segments: &[&str]) -> Self {
        Self::new(Method::PUT, space_id, segments)
    }

    pub(crate) fn delete(space_id: &str, segments: &[&str]) -> Self {
        Self::new(Method::DELETE, space_id, segments)
    }

    #[must_use]
    pub(crate) fn upload_host(mut self) -> Self {
        self.host = Host::Upload;
        self
    }

    #[must_use]
    pub(crate) fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    #[must_use]
    pub(crate) fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Stamp the optimistic-concurrency version.
    #[must_use]
    pub(crate) fn version(self, version: u64) -> Self {
        self.header(VERSION_HEADER, version.to_string())
    }

    pub(crate) fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ContentfulError> {
        self.payload = Payload::Json(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    #[must_use]
    pub(crate) fn binary(mut self, body: impl Into<Bytes>) -> Self {
        self.payload = Payload::Binary(body.into());
        self
    }

    pub(crate) fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}
