//! Native messaging host that runs yt-dlp on behalf of a browser extension.
//!
//! The extension sends `{"url": ..., "use_aria2c": ...}` requests over the
//! host's stdin; the host launches the download tool, relays its progress and
//! reports a terminal `success` or `error` status over stdout.
//!
//! # Crate Structure
//!
//! - [`frame`]: length-prefixed framing of the standard streams
//! - [`protocol`]: request and status messages, and the [`protocol::Transport`] seam
//! - [`supervisor`]: launching the tool and translating its output
//! - [`dispatch`]: the request loop tying them together

/// Re-export frame types.
pub mod frame {
    pub use ytdln_frame::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use ytdln_protocol::*;
}

/// Re-export supervisor types.
pub mod supervisor {
    pub use ytdln_supervisor::*;
}

pub mod dispatch;

pub use dispatch::{serve, DispatchOutcome};
