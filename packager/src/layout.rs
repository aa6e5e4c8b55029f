//! Fixed directory conventions for a module project.
//!
//! Every project packaged by bindery follows the same layout: sources in
//! `src/`, stylesheets in `css/`, localization files in `lang/`, HTML
//! templates in `templates/`, with the package descriptor and manifest
//! template at the root. Build output lands in `dist/` and release bundles
//! in `package/`.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Directory holding module sources, relative to the project root.
pub const SOURCE_DIR: &str = "src";
/// Directory holding stylesheets.
pub const STYLE_DIR: &str = "css";
/// Directory holding localization files.
pub const LANG_DIR: &str = "lang";
/// Directory holding HTML templates.
pub const TEMPLATES_DIR: &str = "templates";
/// Default distribution output directory.
pub const DIST_DIR: &str = "dist";
/// Directory receiving release bundles.
pub const BUNDLE_DIR: &str = "package";
/// Filename of the package descriptor.
pub const DESCRIPTOR_FILE: &str = "package.json";
/// Filename of both the manifest template and the generated manifest.
pub const MANIFEST_FILE: &str = "module.json";
/// Root files copied verbatim into every build output.
pub const META_FILES: &[&str] = &["LICENSE", "README.md"];

/// Environment variable naming the host's external modules directory,
/// used only by the dev build target.
pub const MODULES_DIR_ENV: &str = "BINDERY_MODULES_DIR";

/// Resolved paths for one module project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: Utf8PathBuf,
}

impl ProjectLayout {
    /// Create a layout rooted at the given project directory.
    #[must_use]
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// The project root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path to the source tree.
    #[must_use]
    pub fn source_dir(&self) -> Utf8PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// Path to the stylesheet tree.
    #[must_use]
    pub fn style_dir(&self) -> Utf8PathBuf {
        self.root.join(STYLE_DIR)
    }

    /// Path to the localization tree.
    #[must_use]
    pub fn lang_dir(&self) -> Utf8PathBuf {
        self.root.join(LANG_DIR)
    }

    /// Path to the HTML template tree.
    #[must_use]
    pub fn template_dir(&self) -> Utf8PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// Path to the local distribution output directory.
    #[must_use]
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root.join(DIST_DIR)
    }

    /// Path to the release bundle directory.
    #[must_use]
    pub fn bundle_dir(&self) -> Utf8PathBuf {
        self.root.join(BUNDLE_DIR)
    }

    /// Path to the package descriptor.
    #[must_use]
    pub fn descriptor_file(&self) -> Utf8PathBuf {
        self.root.join(DESCRIPTOR_FILE)
    }

    /// Path to the manifest template.
    #[must_use]
    pub fn manifest_template(&self) -> Utf8PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Root files copied verbatim into the output root.
    #[must_use]
    pub fn meta_files(&self) -> Vec<Utf8PathBuf> {
        META_FILES.iter().map(|f| self.root.join(f)).collect()
    }
}

/// Resolve the dev build output directory for the named module.
///
/// Reads [`MODULES_DIR_ENV`] and appends the module name, so the dev build
/// lands where the host application loads modules from.
///
/// # Errors
///
/// Returns [`PackagerError::MissingConfiguration`] if the variable is unset
/// or empty. The default and bundle targets are unaffected.
pub fn dev_output_dir(module_name: &str) -> Result<Utf8PathBuf> {
    match std::env::var(MODULES_DIR_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            Ok(Utf8PathBuf::from(value).join(module_name))
        }
        _ => Err(PackagerError::MissingConfiguration {
            name: MODULES_DIR_ENV,
            hint: "set it to the host application's modules directory to use the dev target"
                .to_owned(),
        }),
    }
}
