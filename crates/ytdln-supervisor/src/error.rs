/// Guidance sent to the parent when the download tool cannot be launched.
pub const TOOL_NOT_FOUND_MESSAGE: &str =
    "yt-dlp or aria2c not found. Please ensure they are installed and in your system's PATH.";

/// Faults while handling one download request.
///
/// All of these are reported to the parent as an `error` status; none of them
/// stop the host.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The download tool executable could not be found.
    #[error("download tool not found: {program}")]
    ToolNotFound { program: String },

    /// The download tool ran and exited unsuccessfully.
    #[error("download tool failed ({})", describe_exit(.code))]
    ToolFailure { code: Option<i32>, stderr: String },

    /// The request carried no `url`.
    #[error("request has no url")]
    MissingUrl,

    /// Neither a configured nor a platform download directory is available.
    #[error("could not determine a download directory")]
    NoDownloadDir,

    /// The download tool could not be started for a reason other than a
    /// missing executable.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// An I/O error while talking to the running tool.
    #[error("I/O error while supervising download: {0}")]
    Io(#[from] std::io::Error),
}

impl SupervisorError {
    /// The text carried by the `error` status message for this fault.
    ///
    /// Tool failures forward the tool's stderr verbatim, even when empty.
    pub fn status_message(&self) -> String {
        match self {
            SupervisorError::ToolNotFound { .. } => TOOL_NOT_FOUND_MESSAGE.to_string(),
            SupervisorError::ToolFailure { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
