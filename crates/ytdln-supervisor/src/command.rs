use std::ffi::OsString;
use std::process::{Command, Stdio};

use ytdln_protocol::Request;

use crate::config::SupervisorConfig;
use crate::error::SupervisorError;

/// Flags that make yt-dlp print one progress record per line.
const PROGRESS_FLAGS: [&str; 2] = ["--progress", "--newline"];

/// Flags that select the aria2c downloader backend.
const ARIA2C_FLAGS: [&str; 2] = ["--downloader", "aria2c"];

/// A fully resolved tool invocation.
///
/// Arguments are kept as a discrete list and handed to the OS as-is; nothing
/// is ever joined into a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Build a `Command` with stdout and stderr piped and stdin closed.
    ///
    /// The child must never inherit the host's stdin: that stream carries
    /// protocol frames from the parent.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // CREATE_NO_WINDOW: the host itself runs without a console.
            command.creation_flags(0x0800_0000);
        }

        command
    }

    /// Display form of the program, for logs and error messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Build the download tool invocation for one request.
///
/// Layout: `<program> [program args] --progress --newline -o <template>
/// [--downloader aria2c] <url>`. The url is always last and is passed through
/// unvalidated.
pub fn build_command(
    config: &SupervisorConfig,
    request: &Request,
) -> Result<CommandSpec, SupervisorError> {
    let url = request.url.as_deref().ok_or(SupervisorError::MissingUrl)?;
    let template = config.output_template()?;

    let mut args = config.program_args.clone();
    args.extend(PROGRESS_FLAGS.iter().map(OsString::from));
    args.push(OsString::from("-o"));
    args.push(template.into_os_string());
    if request.uses_aria2c() {
        args.extend(ARIA2C_FLAGS.iter().map(OsString::from));
    }
    args.push(OsString::from(url));

    Ok(CommandSpec {
        program: config.program.clone(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config() -> SupervisorConfig {
        SupervisorConfig {
            download_dir: Some(PathBuf::from("/home/user/Downloads")),
            ..SupervisorConfig::default()
        }
    }

    fn args(spec: &CommandSpec) -> Vec<String> {
        spec.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn builds_default_invocation() {
        let spec = build_command(&config(), &Request::new("https://example.com/v")).unwrap();

        assert_eq!(spec.program_name(), "yt-dlp");
        assert_eq!(
            args(&spec),
            [
                "--progress",
                "--newline",
                "-o",
                "/home/user/Downloads/%(title)s.%(ext)s",
                "https://example.com/v",
            ]
        );
    }

    #[test]
    fn aria2c_flags_come_before_the_url() {
        let request = Request::new("https://example.com/v").with_aria2c(true);
        let spec = build_command(&config(), &request).unwrap();

        let args = args(&spec);
        assert_eq!(
            &args[args.len() - 3..],
            ["--downloader", "aria2c", "https://example.com/v"]
        );
    }

    #[test]
    fn aria2c_false_adds_nothing() {
        let with_false = Request::new("u").with_aria2c(false);
        let spec = build_command(&config(), &with_false).unwrap();
        assert!(!args(&spec).iter().any(|arg| arg == "--downloader"));
    }

    #[test]
    fn program_args_lead_the_argument_list() {
        let config = SupervisorConfig {
            program: OsString::from("python3"),
            program_args: vec![OsString::from("-m"), OsString::from("yt_dlp")],
            ..config()
        };
        let spec = build_command(&config, &Request::new("u")).unwrap();

        assert_eq!(spec.program_name(), "python3");
        assert_eq!(&args(&spec)[..3], ["-m", "yt_dlp", "--progress"]);
    }

    #[test]
    fn url_is_a_single_argument() {
        let hostile = "https://example.com/v; rm -rf ~ && echo $(id)";
        let spec = build_command(&config(), &Request::new(hostile)).unwrap();
        assert_eq!(args(&spec).last().map(String::as_str), Some(hostile));
    }

    #[test]
    fn missing_url_is_reported() {
        let err = build_command(&config(), &Request::default()).unwrap_err();
        assert!(matches!(err, SupervisorError::MissingUrl));
    }

    #[test]
    fn command_closes_stdin() {
        let spec = build_command(&config(), &Request::new("u")).unwrap();
        let command = spec.to_command();
        assert_eq!(command.get_program(), "yt-dlp");
        assert_eq!(command.get_args().count(), spec.args.len());
    }
}
