//! File discovery over project and output trees.
//!
//! Discovery is a pure function: each call performs a fresh filesystem walk
//! and returns an owned list, so no shared state accumulates between tasks.
//! Enumeration order is whatever the filesystem yields; callers must not
//! assume sorted output.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};

/// Recursive glob matching every file under a directory.
pub const MATCH_ALL: &str = "**/*";

/// Enumerate files under `base` matching the recursive `pattern`.
///
/// Returns paths relative to `base`, in filesystem enumeration order.
/// Directories are excluded; a missing `base` yields an empty list.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Pattern`] for a malformed glob and
/// [`crate::error::PackagerError::Walk`] if an entry cannot be read.
pub fn discover(base: &Utf8Path, pattern: &str) -> Result<Vec<Utf8PathBuf>> {
    let full_pattern = base.join(pattern);
    let mut files = Vec::new();
    for entry in glob::glob(full_pattern.as_str())? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        let path = Utf8PathBuf::try_from(path).map_err(|e| e.into_io_error())?;
        let relative = path.strip_prefix(base).map_or_else(
            |_| path.clone(),
            camino::Utf8Path::to_path_buf,
        );
        files.push(relative);
    }
    Ok(files)
}
