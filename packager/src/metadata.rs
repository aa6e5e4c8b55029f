//! Module metadata loaded from the package descriptor.
//!
//! The descriptor is a JSON record read once per invocation. All four
//! display fields must be non-empty and the `main` entry point must be
//! present; violations are startup failures, never handled downstream.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Immutable metadata describing the module being packaged.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMetadata {
    /// Machine-readable module name.
    pub name: String,
    /// Human-readable module title.
    pub title: String,
    /// Semantic version string.
    pub version: String,
    /// One-line module description.
    pub description: String,
    /// Entry-point source file, relative to the project root.
    pub main: Utf8PathBuf,
}

impl ModuleMetadata {
    /// Load and validate metadata from the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidDescriptor`] if the file cannot be
    /// read or parsed, and [`PackagerError::MissingConfiguration`] if any
    /// required field is empty.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| PackagerError::InvalidDescriptor {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;
        let metadata: Self =
            serde_json::from_str(&contents).map_err(|e| PackagerError::InvalidDescriptor {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Verify that every required field carries a value.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingConfiguration`] naming the first
    /// empty field.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, &str); 5] = [
            ("package.name", &self.name),
            ("package.title", &self.title),
            ("package.version", &self.version),
            ("package.description", &self.description),
            ("package.main", self.main.as_str()),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PackagerError::MissingConfiguration {
                    name,
                    hint: format!("add a non-empty `{name}` to the package descriptor"),
                });
            }
        }
        Ok(())
    }
}
