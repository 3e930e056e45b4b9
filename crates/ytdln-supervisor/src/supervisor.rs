use ytdln_protocol::{ProtocolError, Request, StatusMessage, Transport};

use crate::command::build_command;
use crate::config::SupervisorConfig;
use crate::error::SupervisorError;
use crate::process::{self, RunError};
use crate::progress::parse_progress;

/// Handles one decoded request, sending its status messages on `transport`.
///
/// Implementations report every request-level fault as an `error` status and
/// return `Err` only when the transport itself fails.
pub trait RequestHandler {
    fn handle(
        &mut self,
        request: &Request,
        transport: &mut dyn Transport,
    ) -> Result<(), ProtocolError>;
}

/// Runs the download tool for each request and relays its progress.
///
/// Stateless between requests; one request runs at a time.
#[derive(Debug, Clone, Default)]
pub struct DownloadSupervisor {
    config: SupervisorConfig,
}

impl DownloadSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Launch the tool and forward progress until it exits.
    fn download(
        &self,
        request: &Request,
        transport: &mut dyn Transport,
    ) -> Result<(), RunError<ProtocolError>> {
        let spec = build_command(&self.config, request)?;
        tracing::debug!(program = %spec.program_name(), args = ?spec.args, "launching download tool");

        let mut reported = 0u64;
        let exit = process::run(&spec, |line| {
            let Some(percent) = parse_progress(line) else {
                tracing::trace!(line, "ignoring tool output");
                return Ok(());
            };
            reported += 1;
            transport.send(&StatusMessage::progress(percent))
        })?;

        tracing::debug!(progress_messages = reported, "download tool output ended");
        exit.into_result()?;
        Ok(())
    }
}

impl RequestHandler for DownloadSupervisor {
    fn handle(
        &mut self,
        request: &Request,
        transport: &mut dyn Transport,
    ) -> Result<(), ProtocolError> {
        let terminal = match self.download(request, transport) {
            Ok(()) => {
                tracing::info!(url = request.url.as_deref(), "download finished");
                StatusMessage::success()
            }
            Err(RunError::Tool(err)) => {
                log_failure(request, &err);
                StatusMessage::error(err.status_message())
            }
            Err(RunError::Line(err)) => return Err(err),
        };
        transport.send(&terminal)
    }
}

fn log_failure(request: &Request, err: &SupervisorError) {
    let url = request.url.as_deref();
    match err {
        SupervisorError::ToolFailure { stderr, .. } => {
            tracing::warn!(url, error = %err, stderr = stderr.trim_end(), "download failed");
        }
        _ => tracing::warn!(url, error = %err, "download failed"),
    }
}
