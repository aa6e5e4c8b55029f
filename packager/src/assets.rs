//! Verbatim asset copying into build output trees.
//!
//! Copy tasks preserve the input layout under the output root. Tree copies
//! enumerate with the recursive glob, so an absent asset directory simply
//! contributes no files; explicitly listed files (license, readme) must
//! exist and their absence is fatal.

use crate::discovery::{MATCH_ALL, discover};
use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Copy every file under `source` into `dest`, preserving relative paths.
///
/// Returns the number of files copied. A missing `source` copies nothing.
///
/// # Errors
///
/// Propagates discovery and I/O failures.
pub fn copy_tree(source: &Utf8Path, dest: &Utf8Path) -> Result<usize> {
    let files = discover(source, MATCH_ALL)?;
    for relative in &files {
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source.join(relative), &target)?;
    }
    Ok(files.len())
}

/// Copy each listed file into `dest_dir`, keeping its filename.
///
/// # Errors
///
/// Returns an I/O error if any listed file is absent or unreadable.
pub fn copy_files(files: &[Utf8PathBuf], dest_dir: &Utf8Path) -> Result<usize> {
    fs::create_dir_all(dest_dir)?;
    for file in files {
        let file_name = file.file_name().unwrap_or(file.as_str());
        fs::copy(file, dest_dir.join(file_name))?;
    }
    Ok(files.len())
}
