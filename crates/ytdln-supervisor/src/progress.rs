//! Progress extraction from yt-dlp output.
//!
//! With `--progress --newline` yt-dlp prints one record per line:
//!
//! ```text
//! [download]   1.5% of ~123.45MiB at  5.23MiB/s ETA 00:23
//! [download] 100% of 123.45MiB in 00:24
//! [Merger] Merging formats into "filename.mp4"
//! ```
//!
//! Only the percentage is extracted. Everything else on the line, and every
//! line without a percentage, is ignored.

use std::sync::LazyLock;

use regex::Regex;

static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[download\]\s+(\d+(?:\.\d+)?)\s*%").expect("progress pattern is valid")
});

/// Extract the percentage from one line of tool output.
///
/// Returns `None` for banners, warnings, destination notices, post-processing
/// messages and anything else that is not a download-progress record.
pub fn parse_progress(line: &str) -> Option<f64> {
    let captures = PROGRESS_LINE.captures(line)?;
    captures.get(1)?.as_str().parse::<f64>().ok()
}
