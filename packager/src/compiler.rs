//! Source compilation collaborator.
//!
//! Compilation is an external capability, not something the pipeline
//! defines: the orchestrator only requires that `src/` is materialized under
//! the output root before manifest discovery runs. The trait seam lets real
//! projects plug in an external compiler command while the default
//! collaborator simply relocates sources, renaming `.ts` entries to the
//! `.js` files the host runtime loads.

use crate::discovery::{MATCH_ALL, discover};
use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::process::Command;

/// Compiles a source tree into an output directory.
pub trait SourceCompiler: Send + Sync {
    /// Compile everything under `source_dir` into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CompileFailed`] when the collaborator
    /// reports failure, or an I/O error if output cannot be written.
    fn compile(&self, source_dir: &Utf8Path, out_dir: &Utf8Path) -> Result<()>;
}

/// Default collaborator: copy sources verbatim, renaming `.ts` to `.js`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyCompiler;

impl SourceCompiler for CopyCompiler {
    fn compile(&self, source_dir: &Utf8Path, out_dir: &Utf8Path) -> Result<()> {
        for relative in discover(source_dir, MATCH_ALL)? {
            let mut dest = out_dir.join(&relative);
            if dest.extension() == Some("ts") {
                dest.set_extension("js");
            }
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(source_dir.join(&relative), &dest)?;
        }
        Ok(())
    }
}

/// Collaborator that invokes an external compiler command.
///
/// The command is run as `{program} {source_dir} {out_dir}` and must exit
/// zero on success.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
}

impl CommandCompiler {
    /// Create a compiler that shells out to `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SourceCompiler for CommandCompiler {
    fn compile(&self, source_dir: &Utf8Path, out_dir: &Utf8Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;
        let output = Command::new(&self.program)
            .arg(source_dir.as_str())
            .arg(out_dir.as_str())
            .output()
            .map_err(|e| PackagerError::CompileFailed {
                reason: format!("failed to launch {}: {e}", self.program),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PackagerError::CompileFailed {
                reason: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
            });
        }
        Ok(())
    }
}
