//! Length-prefixed message framing for native-messaging hosts.
//!
//! Every message on the wire is:
//! - A 4-byte little-endian payload length
//! - The payload itself (UTF-8 JSON at the protocol layer, opaque here)
//!
//! [`FrameReader`] and [`FrameWriter`] do the blocking I/O on the standard
//! streams; [`encode_frame`] and [`payload_len`] are the wire format itself.
//! End of input at a frame boundary is `Ok(None)`, never an error.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    encode_frame, payload_len, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE,
    MAX_WIRE_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
