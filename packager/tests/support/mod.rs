//! Test support utilities for packager integration tests.
//!
//! Provides scaffolding helpers that lay out a minimal module project inside
//! a temporary directory: sources, stylesheets, assets, descriptor, and
//! manifest template.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A manifest template covering all six placeholder tokens.
pub const TEMPLATE: &str = concat!(
    "{\n",
    "\t\"name\": \"{{name}}\",\n",
    "\t\"title\": \"{{title}}\",\n",
    "\t\"version\": \"{{version}}\",\n",
    "\t\"description\": \"{{description}}\",\n",
    "\t\"esmodules\": \"{{sources}}\",\n",
    "\t\"styles\": \"{{css}}\"\n",
    "}\n",
);

/// A descriptor for the `demo` module used throughout the tests.
pub const DESCRIPTOR: &str = concat!(
    "{\"name\":\"demo\",\"title\":\"Demo\",\"version\":\"1.0.0\",",
    "\"description\":\"d\",\"main\":\"src/demo.ts\"}",
);

/// Return the temp directory root as a UTF-8 path.
pub fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp path is UTF-8")
}

/// Lay out a complete module project under `root`.
pub fn scaffold_project(root: &Utf8Path) {
    scaffold_bare_project(root);
    fs::write(root.join("src/demo.ts"), "export const demo = 1;").expect("write source");
    fs::write(root.join("css/demo.css"), ".demo{}").expect("write stylesheet");
    fs::write(root.join("lang/en.json"), "{\"DEMO\":\"Demo\"}").expect("write language file");
    fs::write(root.join("templates/sheet.html"), "<div></div>").expect("write template");
}

/// Lay out the project skeleton without any source or style files.
pub fn scaffold_bare_project(root: &Utf8Path) {
    for dir in ["src", "css", "lang", "templates"] {
        fs::create_dir_all(root.join(dir)).expect("create project dirs");
    }
    fs::write(root.join("package.json"), DESCRIPTOR).expect("write descriptor");
    fs::write(root.join("module.json"), TEMPLATE).expect("write manifest template");
    fs::write(root.join("LICENSE"), "ISC").expect("write license");
    fs::write(root.join("README.md"), "# demo").expect("write readme");
}
