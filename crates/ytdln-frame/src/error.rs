/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended inside the 4-byte length prefix.
    #[error("truncated length prefix ({received} of 4 bytes before end of input)")]
    TruncatedHeader { received: usize },

    /// The stream ended before the announced payload length was read.
    #[error("truncated payload ({received} of {expected} bytes before end of input)")]
    TruncatedPayload { expected: usize, received: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer stopped accepting bytes mid-frame.
    #[error("connection closed (write returned zero bytes)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
