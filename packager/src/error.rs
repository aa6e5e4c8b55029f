//! Error types for the bindery packager CLI.
//!
//! This module defines semantic error variants for every way a build
//! invocation can fail. Failures are always fatal: the orchestrator never
//! retries, and files written before the failure remain on disk.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during a packaging invocation.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Post-build discovery found neither script nor style files.
    ///
    /// This is the sole defensive check in the pipeline and indicates a
    /// misconfigured or incomplete source/style tree.
    #[error("no files discovered under {source_dir} or {style_dir}")]
    NoFilesDiscovered {
        /// Directory searched for compiled script files.
        source_dir: Utf8PathBuf,
        /// Directory searched for copied stylesheet files.
        style_dir: Utf8PathBuf,
    },

    /// A required metadata field or environment value is absent.
    #[error("missing configuration: {name}; {hint}")]
    MissingConfiguration {
        /// Name of the missing field or variable.
        name: &'static str,
        /// How to supply the missing value.
        hint: String,
    },

    /// The package descriptor could not be read or parsed.
    #[error("invalid package descriptor at {path}: {reason}")]
    InvalidDescriptor {
        /// Path to the descriptor file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The source compiler collaborator reported a failure.
    #[error("compilation failed: {reason}")]
    CompileFailed {
        /// Description of the compilation failure.
        reason: String,
    },

    /// The release archive could not be created.
    #[error("archive creation failed: {reason}")]
    ArchiveFailed {
        /// Description of the compression failure.
        reason: String,
    },

    /// The task graph could not be scheduled.
    #[error("invalid task plan: {reason}")]
    PlanInvalid {
        /// Description of the scheduling failure.
        reason: String,
    },

    /// A discovery glob pattern was malformed.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A filesystem entry could not be read during discovery.
    #[error("discovery failed: {0}")]
    Walk(#[from] glob::GlobError),

    /// A zip archive operation failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
