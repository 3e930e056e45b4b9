/// Errors that can occur while exchanging protocol messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] ytdln_frame::FrameError),

    /// The frame payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is valid JSON but not a usable request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
