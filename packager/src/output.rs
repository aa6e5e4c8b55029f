//! Progress output formatting for the packager CLI.
//!
//! User-facing progress goes to an injected stderr sink so tests can capture
//! it; diagnostic detail goes through the `log` facade instead.

use camino::Utf8Path;
use std::io::Write;

/// Write one line to the given sink, swallowing write failures.
///
/// Progress output is best-effort; a broken pipe must not abort a build.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the success message for a completed build.
#[must_use]
pub fn build_success_message(out_dir: &Utf8Path) -> String {
    format!("Build complete: {out_dir}")
}

/// Format the success message for a completed release bundle.
#[must_use]
pub fn bundle_success_message(archive: &Utf8Path) -> String {
    format!("Bundle complete: {archive}")
}
