//! Download supervision for the ytdln native host.
//!
//! One request runs end to end inside [`DownloadSupervisor::handle`]:
//!
//! 1. [`command`] turns the request into a discrete argument list for the
//!    download tool (no shell involved).
//! 2. [`process`] launches the tool with piped output, feeds every stdout
//!    line through [`progress::parse_progress`], and waits for exit.
//! 3. The outcome is classified into exactly one terminal status message.
//!
//! Download faults never escape `handle`; they become `error` messages. The
//! only error it returns is a failure to write to the parent.

pub mod command;
pub mod config;
pub mod error;
pub mod process;
pub mod progress;
pub mod supervisor;

pub use command::{build_command, CommandSpec};
pub use config::{SupervisorConfig, DEFAULT_PROGRAM, OUTPUT_TEMPLATE};
pub use error::{SupervisorError, TOOL_NOT_FOUND_MESSAGE};
pub use progress::parse_progress;
pub use supervisor::{DownloadSupervisor, RequestHandler};
