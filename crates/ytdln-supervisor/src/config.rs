use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::SupervisorError;

/// Executable launched when no override is configured.
pub const DEFAULT_PROGRAM: &str = "yt-dlp";

/// yt-dlp output template appended to the download directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// How the download tool is located and where it writes.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Executable name or path. Bare names are looked up on `PATH`.
    pub program: OsString,
    /// Arguments placed before the fixed flags, e.g. `["-m", "yt_dlp"]` when
    /// `program` is a Python interpreter.
    pub program_args: Vec<OsString>,
    /// Directory for finished downloads. `None` uses the platform download
    /// directory.
    pub download_dir: Option<PathBuf>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            program: OsString::from(DEFAULT_PROGRAM),
            program_args: Vec::new(),
            download_dir: None,
        }
    }
}

impl SupervisorConfig {
    /// Resolve the download directory.
    ///
    /// Resolution order:
    /// 1. The configured `download_dir`
    /// 2. The platform download directory (`XDG_DOWNLOAD_DIR`, `~/Downloads`
    ///    on macOS, the Downloads known folder on Windows)
    /// 3. `<home>/Downloads`
    pub fn resolve_download_dir(&self) -> Result<PathBuf, SupervisorError> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .ok_or(SupervisorError::NoDownloadDir)
    }

    /// Full yt-dlp output template under the download directory.
    pub fn output_template(&self) -> Result<PathBuf, SupervisorError> {
        Ok(self.resolve_download_dir()?.join(OUTPUT_TEMPLATE))
    }

    /// Display form of the program, for logs and error messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}
