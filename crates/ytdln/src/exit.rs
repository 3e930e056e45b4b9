use std::io;

use ytdln::frame::FrameError;
use ytdln::protocol::ProtocolError;
use ytdln::DispatchOutcome;

// Process exit codes. clap reports usage errors itself with 2.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const INTERNAL: i32 = 125;

/// Exit code for the way the request loop ended.
pub fn outcome_code(outcome: &DispatchOutcome) -> i32 {
    match outcome {
        DispatchOutcome::Shutdown => SUCCESS,
        DispatchOutcome::Fatal(err) => protocol_code(err),
    }
}

pub fn protocol_code(err: &ProtocolError) -> i32 {
    match err {
        ProtocolError::Frame(err) => frame_code(err),
        ProtocolError::InvalidUtf8(_)
        | ProtocolError::Json(_)
        | ProtocolError::InvalidRequest(_) => DATA_INVALID,
    }
}

pub fn frame_code(err: &FrameError) -> i32 {
    match err {
        FrameError::Io(source) => io_code(source),
        FrameError::PayloadTooLarge { .. }
        | FrameError::TruncatedHeader { .. }
        | FrameError::TruncatedPayload { .. } => DATA_INVALID,
        FrameError::ConnectionClosed => FAILURE,
    }
}

pub fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::WriteZero
        | io::ErrorKind::ConnectionReset => FAILURE,
        _ => INTERNAL,
    }
}
