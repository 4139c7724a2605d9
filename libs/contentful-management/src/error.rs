use contentful_http::{HttpError, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by every SDK operation.
#[derive(Debug, Error)]
pub enum ContentfulError {
    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(HttpError),

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(ApiError),

    /// HTTP 409: the `X-Contentful-Version` sent was stale. Refetch the
    /// entity and reapply the change.
    #[error("version conflict: {0}")]
    VersionConflict(ApiError),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mutation needs server metadata the in-memory entity does not carry.
    #[error("{entity} has no sys.{field}")]
    MissingSys {
        entity: &'static str,
        field: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContentfulError {
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict(_))
    }

    /// HTTP status of an API failure.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(api) | Self::VersionConflict(api) => Some(api.status),
            _ => None,
        }
    }

    pub(crate) fn missing_sys(entity: &'static str, field: &'static str) -> Self {
        Self::MissingSys { entity, field }
    }
}

impl From<HttpError> for ContentfulError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::HttpStatus {
                status,
                body_preview,
                ..
            } => {
                let api = ApiError::from_body(status, &body_preview);
                if status == StatusCode::CONFLICT {
                    Self::VersionConflict(api)
                } else {
                    Self::Api(api)
                }
            }
            HttpError::Json(e) => Self::Decode(e),
            other => Self::Transport(other),
        }
    }
}

/// Non-success response, decoded from the management API error envelope
/// when the body has one.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    /// Error code from `sys.id`, e.g. `NotFound` or `VersionMismatch`.
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
    pub details: Option<Value>,
    /// Raw (truncated) body as received.
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.describe())
    }
}

impl std::error::Error for ApiError {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    sys: Option<ErrorSys>,
    message: Option<String>,
    request_id: Option<String>,
    details: Option<Value>,
}

#[derive(Deserialize)]
struct ErrorSys {
    id: Option<String>,
}

impl ApiError {
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let (code, message, request_id, details) = match envelope {
            Some(env) => (
                env.sys.and_then(|s| s.id),
                env.message,
                env.request_id,
                env.details,
            ),
            None => (None, None, None, None),
        };

        Self {
            status,
            code,
            message,
            request_id,
            details,
            body: body.to_owned(),
        }
    }

    fn describe(&self) -> &str {
        self.message
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or(&self.body)
    }
}
