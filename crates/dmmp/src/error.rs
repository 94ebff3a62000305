use dmmp_frame::FrameError;
use dmmp_transport::TransportError;

/// Errors returned by multipathd queries.
#[derive(Debug, thiserror::Error)]
pub enum DmmpError {
    /// Connecting, timing out, or losing the socket mid-exchange.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply's length prefix was malformed, truncated or oversized.
    #[error("framing error: {0}")]
    Framing(FrameError),

    /// multipathd speaks a JSON API major version this client does not.
    #[error("unsupported multipathd API major version {found} (expected {expected})")]
    VersionMismatch { expected: i64, found: i128 },

    /// The reply payload is not valid UTF-8.
    #[error("reply is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The reply is not valid JSON, or a field has the wrong type.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level field is absent from the reply.
    #[error("reply is missing required field `{0}`")]
    MissingField(&'static str),

    /// The client configuration cannot be used for a query.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(&'static str),
}

impl DmmpError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_framing(&self) -> bool {
        matches!(self, Self::Framing(_))
    }

    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }

    /// True for UTF-8, JSON and missing-field errors.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Utf8(_) | Self::Json(_) | Self::MissingField(_))
    }
}

// Socket-level frame failures are transport problems, not framing ones.
impl From<FrameError> for DmmpError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(io) => Self::Transport(TransportError::Io(io)),
            FrameError::ConnectionClosed => Self::Transport(TransportError::ConnectionClosed),
            other => Self::Framing(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DmmpError>;
