//! Child process ownership for one download.
//!
//! stdout is consumed line by line on the calling thread. stderr is drained
//! into memory by a helper thread so the tool can never block on a full
//! stderr pipe while the caller is still reading stdout. The helper is joined
//! whenever the run completes; if the run is abandoned it is left to finish
//! with the tool. Supervision faults reap the child before returning.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStderr, ExitStatus};
use std::thread;

use crate::command::CommandSpec;
use crate::error::SupervisorError;

/// How a finished tool run ended.
#[derive(Debug)]
pub struct ToolExit {
    pub status: ExitStatus,
    /// Everything the tool wrote to stderr, decoded lossily.
    pub stderr: String,
}

impl ToolExit {
    /// `Ok` for exit code 0, otherwise a `ToolFailure` carrying stderr.
    pub fn into_result(self) -> Result<(), SupervisorError> {
        if self.status.success() {
            Ok(())
        } else {
            Err(SupervisorError::ToolFailure {
                code: self.status.code(),
                stderr: self.stderr,
            })
        }
    }
}

/// Why a run stopped before the tool's exit status was collected.
#[derive(Debug)]
pub enum RunError<E> {
    /// Launching or supervising the tool failed.
    Tool(SupervisorError),
    /// The line callback failed; the run was abandoned.
    Line(E),
}

impl<E> From<SupervisorError> for RunError<E> {
    fn from(err: SupervisorError) -> Self {
        RunError::Tool(err)
    }
}

/// Launch `spec`, pass every stdout line (trimmed, lossily decoded) to
/// `on_line`, then wait for the tool to exit.
///
/// If `on_line` fails, stdout is closed immediately and the error is returned
/// without waiting for the tool; it is not killed.
pub fn run<E, F>(spec: &CommandSpec, mut on_line: F) -> Result<ToolExit, RunError<E>>
where
    F: FnMut(&str) -> Result<(), E>,
{
    let mut child = spec.to_command().spawn().map_err(|err| spawn_error(spec, err))?;
    tracing::debug!(program = %spec.program_name(), pid = child.id(), "download tool started");

    let captured = capture(&mut child, &mut on_line);
    settle(&mut child, captured)
}

/// Stream the child's stdout to `on_line` and collect its stderr.
fn capture<E, F>(child: &mut Child, on_line: &mut F) -> Result<String, RunError<E>>
where
    F: FnMut(&str) -> Result<(), E>,
{
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| SupervisorError::Io(io::Error::other("tool stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| SupervisorError::Io(io::Error::other("tool stderr was not captured")))?;

    let drain = thread::Builder::new()
        .name("ytdln-stderr".to_string())
        .spawn(move || drain_stderr(stderr))
        .map_err(SupervisorError::Io)?;

    for_each_line(stdout, on_line)?;

    match drain.join() {
        Ok(result) => Ok(result.map_err(SupervisorError::Io)?),
        Err(_) => Err(SupervisorError::Io(io::Error::other("stderr reader panicked")).into()),
    }
}

/// Collect the exit status once capture has finished.
///
/// A supervision fault still reaps the child before it is reported. A line
/// callback failure returns at once and leaves the child running.
fn settle<E>(
    child: &mut Child,
    captured: Result<String, RunError<E>>,
) -> Result<ToolExit, RunError<E>> {
    let stderr = match captured {
        Ok(stderr) => stderr,
        Err(RunError::Tool(err)) => {
            if let Err(wait_err) = child.wait() {
                tracing::warn!(error = %wait_err, "could not reap download tool");
            }
            return Err(RunError::Tool(err));
        }
        Err(line) => return Err(line),
    };

    let status = child.wait().map_err(SupervisorError::Io)?;
    tracing::debug!(%status, stderr_bytes = stderr.len(), "download tool exited");

    Ok(ToolExit { status, stderr })
}

fn spawn_error(spec: &CommandSpec, err: io::Error) -> SupervisorError {
    let program = spec.program_name();
    if err.kind() == io::ErrorKind::NotFound {
        SupervisorError::ToolNotFound { program }
    } else {
        SupervisorError::Spawn {
            program,
            source: err,
        }
    }
}

/// Feed each line of `source` to `on_line` until end of input.
///
/// Lines are trimmed of surrounding whitespace (including `\r`). Bytes that
/// are not valid UTF-8 are replaced rather than aborting the run.
pub fn for_each_line<R, E, F>(source: R, on_line: &mut F) -> Result<(), RunError<E>>
where
    R: Read,
    F: FnMut(&str) -> Result<(), E>,
{
    let mut reader = BufReader::new(source);
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(SupervisorError::Io)?;
        if read == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&line);
        on_line(text.trim()).map_err(RunError::Line)?;
    }
}

fn drain_stderr(mut stderr: ChildStderr) -> io::Result<String> {
    let mut raw = Vec::new();
    stderr.read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
