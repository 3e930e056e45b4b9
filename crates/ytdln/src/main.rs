mod exit;
mod logging;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use ytdln::frame::{FrameConfig, DEFAULT_MAX_PAYLOAD};
use ytdln::protocol::stdio;
use ytdln::supervisor::{DownloadSupervisor, SupervisorConfig, DEFAULT_PROGRAM};
use ytdln::{serve, DispatchOutcome};

use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "ytdln-host",
    version,
    about = "Native messaging host that runs yt-dlp for the ytdln browser extension"
)]
struct Cli {
    /// Download tool executable (name on PATH or full path).
    #[arg(
        long = "yt-dlp",
        value_name = "PROGRAM",
        env = "YTDLN_YT_DLP",
        default_value = DEFAULT_PROGRAM
    )]
    yt_dlp: OsString,

    /// Argument placed before the fixed yt-dlp flags. Repeatable.
    #[arg(long = "yt-dlp-arg", value_name = "ARG", allow_hyphen_values = true)]
    yt_dlp_args: Vec<OsString>,

    /// Directory downloads are written to [default: platform downloads dir].
    #[arg(long, value_name = "DIR", env = "YTDLN_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", env = "YTDLN_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", env = "YTDLN_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Largest inbound frame payload accepted, in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_PAYLOAD,
        value_parser = parse_frame_size
    )]
    max_frame_size: usize,

    /// Arguments appended by the browser (caller origin, manifest path,
    /// parent window handle). Ignored.
    #[arg(
        value_name = "CALLER_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        hide = true
    )]
    caller_args: Vec<String>,
}

impl Cli {
    fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            program: self.yt_dlp.clone(),
            program_args: self.yt_dlp_args.clone(),
            download_dir: self.download_dir.clone(),
        }
    }

    fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_payload_size: self.max_frame_size,
        }
    }
}

fn parse_frame_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|err| format!("invalid byte count: {err}"))?;
    if size == 0 {
        return Err("frame size must be at least 1 byte".to_string());
    }
    if u32::try_from(size).is_err() {
        return Err(format!("frame size must fit the 4-byte length prefix (max {})", u32::MAX));
    }
    Ok(size)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    if !cli.caller_args.is_empty() {
        tracing::debug!(caller_args = ?cli.caller_args, "ignoring caller arguments");
    }

    let config = cli.supervisor_config();
    match config.resolve_download_dir() {
        Ok(dir) => tracing::debug!(download_dir = %dir.display(), "download directory resolved"),
        Err(err) => tracing::warn!(error = %err, "requests will fail until a download directory is configured"),
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        program = %config.program_name(),
        "native host started"
    );

    let mut transport = stdio(cli.frame_config());
    let mut supervisor = DownloadSupervisor::new(config);
    let outcome = serve(&mut transport, &mut supervisor);

    if let DispatchOutcome::Fatal(err) = &outcome {
        eprintln!("error: {err}");
    }
    std::process::exit(exit::outcome_code(&outcome));
}
