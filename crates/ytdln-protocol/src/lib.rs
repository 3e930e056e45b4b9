//! JSON messages and transports for the ytdln native host.
//!
//! This layer turns raw frames into protocol values: inbound frames carry a
//! [`Request`], outbound frames carry a [`StatusMessage`]. The [`Transport`]
//! trait is the seam the dispatcher and supervisor are written against;
//! [`FramedTransport`] speaks the wire format over any reader/writer pair and
//! [`MemoryTransport`] keeps everything in memory.

pub mod error;
pub mod memory;
pub mod message;
pub mod transport;

pub use error::{ProtocolError, Result};
pub use memory::MemoryTransport;
pub use message::{Request, StatusMessage};
pub use transport::{stdio, FramedTransport, StdioTransport, Transport};
