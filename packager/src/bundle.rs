//! Release bundle staging and compression.
//!
//! The release target copies the distribution tree into a name-qualified
//! staging subdirectory, compresses that subdirectory into a single zip
//! archive whose entries all sit under the module-name root, places a
//! standalone manifest copy next to the archive, and removes the staging
//! subdirectory afterwards.

use crate::discovery::{MATCH_ALL, discover};
use crate::error::{PackagerError, Result};
use crate::layout::MANIFEST_FILE;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Copy the distribution tree into `dist/<name>/`.
///
/// The file list is snapshotted before copying so the staging subdirectory
/// never includes itself. Returns the staging path.
///
/// # Errors
///
/// Propagates discovery and I/O failures.
pub fn stage_distribution(dist_dir: &Utf8Path, module_name: &str) -> Result<Utf8PathBuf> {
    let staged_dir = dist_dir.join(module_name);
    let files = discover(dist_dir, MATCH_ALL)?;

    for relative in &files {
        if relative.starts_with(module_name) {
            continue;
        }
        let target = staged_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(dist_dir.join(relative), &target)?;
    }
    Ok(staged_dir)
}

/// Compress the staged tree into `<bundle_dir>/<name>.zip`.
///
/// Every archive entry is placed under a `<name>/` root so the module
/// unpacks into its own directory. Returns the archive path.
///
/// # Errors
///
/// Returns [`PackagerError::ArchiveFailed`] if the staged tree is empty,
/// and propagates I/O or zip failures otherwise.
pub fn compress_staged(
    staged_dir: &Utf8Path,
    module_name: &str,
    bundle_dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let files = discover(staged_dir, MATCH_ALL)?;
    if files.is_empty() {
        return Err(PackagerError::ArchiveFailed {
            reason: format!("nothing staged under {staged_dir}"),
        });
    }

    fs::create_dir_all(bundle_dir)?;
    let archive_path = bundle_dir.join(format!("{module_name}.zip"));
    let mut writer = ZipWriter::new(fs::File::create(&archive_path)?);
    let options = SimpleFileOptions::default();

    for relative in &files {
        writer.start_file(format!("{module_name}/{relative}"), options)?;
        let mut source = fs::File::open(staged_dir.join(relative))?;
        std::io::copy(&mut source, &mut writer)?;
    }
    writer.finish()?;

    Ok(archive_path)
}

/// Copy the generated manifest from the distribution root into the bundle
/// directory.
///
/// # Errors
///
/// Returns an I/O error if the manifest is absent or unreadable.
pub fn copy_bundle_manifest(dist_dir: &Utf8Path, bundle_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    fs::create_dir_all(bundle_dir)?;
    let target = bundle_dir.join(MANIFEST_FILE);
    fs::copy(dist_dir.join(MANIFEST_FILE), &target)?;
    Ok(target)
}

/// Delete the staging subdirectory after compression.
///
/// Idempotent: an already-absent directory is not an error.
///
/// # Errors
///
/// Propagates any other I/O failure.
pub fn remove_staging(staged_dir: &Utf8Path) -> Result<()> {
    match fs::remove_dir_all(staged_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
