use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Upper bound on how much of an error body is kept in
/// [`HttpError::HttpStatus::body_preview`].
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Boxed response body; already decompressed when the server sent
/// `Content-Encoding`.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP response with size-limited body readers.
///
/// - `bytes()` reads the body regardless of status
/// - `checked_bytes()`, `json()` and `text()` turn non-2xx into
///   [`HttpError::HttpStatus`] with a bounded body preview
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the body without looking at the status.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the limit.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Read the body, failing on non-2xx.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        checked_body(self.inner, self.max_body_size).await
    }

    /// Parse the body as JSON, failing on non-2xx.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes), plus `HttpError::Json`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = checked_body(self.inner, self.max_body_size).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Read the body as lossy UTF-8, failing on non-2xx.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes).
    pub async fn text(self) -> Result<String, HttpError> {
        let body = checked_body(self.inner, self.max_body_size).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

async fn checked_body(
    response: Response<ResponseBody>,
    max_body_size: usize,
) -> Result<Bytes, HttpError> {
    let status = response.status();
    if status.is_success() {
        return read_body_limited(response, max_body_size).await;
    }

    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let preview_limit = max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
    let body_preview = match read_body_limited(response, preview_limit).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
        Err(e) => return Err(e),
    };

    Err(HttpError::HttpStatus {
        status,
        body_preview,
        content_type,
    })
}

/// Collect the body, enforcing `limit` on decompressed bytes.
async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let (_parts, body) = response.into_parts();

    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
