//! Manifest synthesis from a template and discovered file lists.
//!
//! The manifest template is the project's `module.json` with six placeholder
//! tokens. Scalar placeholders take metadata fields verbatim; the two array
//! placeholders appear as quoted strings in the template and are replaced,
//! quotes included, by a rendered array literal of discovered file paths.

use crate::discovery::{MATCH_ALL, discover};
use crate::error::{PackagerError, Result};
use crate::layout::{MANIFEST_FILE, SOURCE_DIR, STYLE_DIR};
use crate::metadata::ModuleMetadata;
use camino::{Utf8Path, Utf8PathBuf};

/// Maximum rendered width for a single-line array literal.
const MAX_COMPACT_WIDTH: usize = 80;

/// Manifest template text, loaded fresh per invocation.
#[derive(Debug, Clone)]
pub struct ManifestTemplate(String);

impl ManifestTemplate {
    /// Load the template from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the file cannot be read.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        Ok(Self(std::fs::read_to_string(path)?))
    }

    /// Wrap already-loaded template text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw template text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Script and style files discovered in a build output tree.
///
/// Both lists hold paths relative to the output root, in filesystem
/// enumeration order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    /// Compiled script files under `src/`.
    pub scripts: Vec<Utf8PathBuf>,
    /// Copied stylesheet files under `css/`.
    pub styles: Vec<Utf8PathBuf>,
}

impl DiscoveredFiles {
    /// Returns true if neither scripts nor styles were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.styles.is_empty()
    }
}

/// The six placeholder tokens recognized in a manifest template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{{name}}` — module name.
    Name,
    /// `{{title}}` — module title.
    Title,
    /// `{{version}}` — module version.
    Version,
    /// `{{description}}` — module description.
    Description,
    /// `"{{sources}}"` — script file array; quotes are part of the token.
    Sources,
    /// `"{{css}}"` — stylesheet file array; quotes are part of the token.
    Css,
}

impl Placeholder {
    /// All placeholders, in substitution order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Title,
        Self::Version,
        Self::Description,
        Self::Sources,
        Self::Css,
    ];

    /// The literal token this placeholder matches in the template.
    ///
    /// Array placeholders include the surrounding quotes so the replacement
    /// removes them: the rendered array is a structured value, not a scalar.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Name => "{{name}}",
            Self::Title => "{{title}}",
            Self::Version => "{{version}}",
            Self::Description => "{{description}}",
            Self::Sources => "\"{{sources}}\"",
            Self::Css => "\"{{css}}\"",
        }
    }
}

/// Scan a build output tree for compiled scripts and copied stylesheets.
///
/// Scripts are `src/**/*.js` and styles `css/**/*.css`, both relative to
/// `out_dir`. Run only after the compile and style-copy tasks have
/// materialized their output.
///
/// # Errors
///
/// Propagates discovery failures; see [`discover`].
pub fn discover_outputs(out_dir: &Utf8Path) -> Result<DiscoveredFiles> {
    let source_dir = out_dir.join(SOURCE_DIR);
    let style_dir = out_dir.join(STYLE_DIR);

    let scripts = discover(&source_dir, MATCH_ALL)?
        .into_iter()
        .filter(|p| p.extension() == Some("js"))
        .map(|p| Utf8PathBuf::from(SOURCE_DIR).join(p))
        .collect();
    let styles = discover(&style_dir, MATCH_ALL)?
        .into_iter()
        .filter(|p| p.extension() == Some("css"))
        .map(|p| Utf8PathBuf::from(STYLE_DIR).join(p))
        .collect();

    Ok(DiscoveredFiles { scripts, styles })
}

/// Substitute every placeholder in `template` and return the manifest text.
///
/// Known limitation: metadata values that themselves contain
/// placeholder-like tokens produce undefined output, since substitutions
/// are applied token by token over the document.
///
/// # Errors
///
/// Returns [`PackagerError::NoFilesDiscovered`] when `files` is empty. This
/// is the pipeline's only defensive check; nothing is written in that case.
pub fn synthesize(
    metadata: &ModuleMetadata,
    template: &ManifestTemplate,
    files: &DiscoveredFiles,
    out_dir: &Utf8Path,
) -> Result<String> {
    if files.is_empty() {
        return Err(PackagerError::NoFilesDiscovered {
            source_dir: out_dir.join(SOURCE_DIR),
            style_dir: out_dir.join(STYLE_DIR),
        });
    }

    let mut document = template.text().to_owned();
    for placeholder in Placeholder::ALL {
        let replacement = render(placeholder, metadata, files);
        document = document.replace(placeholder.token(), &replacement);
    }
    Ok(document)
}

/// Synthesize the manifest and write it to `<out_dir>/module.json`.
///
/// # Errors
///
/// Propagates synthesis failures and any I/O error from the single write.
pub fn write_manifest(
    metadata: &ModuleMetadata,
    template: &ManifestTemplate,
    files: &DiscoveredFiles,
    out_dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let document = synthesize(metadata, template, files, out_dir)?;
    let manifest_path = out_dir.join(MANIFEST_FILE);
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(&manifest_path, document)?;
    Ok(manifest_path)
}

/// Resolve the replacement text for one placeholder.
fn render(placeholder: Placeholder, metadata: &ModuleMetadata, files: &DiscoveredFiles) -> String {
    match placeholder {
        Placeholder::Name => metadata.name.clone(),
        Placeholder::Title => metadata.title.clone(),
        Placeholder::Version => metadata.version.clone(),
        Placeholder::Description => metadata.description.clone(),
        Placeholder::Sources => render_path_array(&files.scripts),
        Placeholder::Css => render_path_array(&files.styles),
    }
}

/// Render a path list as a JSON array literal for embedding in the template.
///
/// Each element is serialized as a JSON string, so quotes and backslashes in
/// file names are escaped. Short arrays render on a single line; longer ones
/// render one element per line with tab indentation, then the whole literal
/// is re-indented by one extra tab so continuation lines align with the
/// embedding context. Discovery order is preserved, never sorted.
#[must_use]
pub fn render_path_array(paths: &[Utf8PathBuf]) -> String {
    let quoted: Vec<String> = paths
        .iter()
        .map(|p| serde_json::Value::String(p.as_str().to_owned()).to_string())
        .collect();

    let compact = format!("[{}]", quoted.join(", "));
    if compact.len() <= MAX_COMPACT_WIDTH {
        return compact;
    }

    let body = quoted.join(",\n\t");
    let multiline = format!("[\n\t{body}\n]");
    multiline.replace('\n', "\n\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn metadata() -> ModuleMetadata {
        ModuleMetadata {
            name: "demo".to_owned(),
            title: "Demo".to_owned(),
            version: "1.0.0".to_owned(),
            description: "d".to_owned(),
            main: Utf8PathBuf::from("src/module.ts"),
        }
    }

    fn template() -> ManifestTemplate {
        ManifestTemplate::from_text(concat!(
            "{\n",
            "\t\"name\": \"{{name}}\",\n",
            "\t\"title\": \"{{title}}\",\n",
            "\t\"version\": \"{{version}}\",\n",
            "\t\"description\": \"{{description}}\",\n",
            "\t\"esmodules\": \"{{sources}}\",\n",
            "\t\"styles\": \"{{css}}\"\n",
            "}\n",
        ))
    }

    fn files() -> DiscoveredFiles {
        DiscoveredFiles {
            scripts: vec![Utf8PathBuf::from("src/demo.js")],
            styles: vec![Utf8PathBuf::from("css/demo.css")],
        }
    }

    #[test]
    fn synthesis_leaves_no_placeholder_tokens() {
        let manifest = synthesize(&metadata(), &template(), &files(), Utf8Path::new("dist"))
            .expect("synthesis succeeds");
        for placeholder in Placeholder::ALL {
            assert!(
                !manifest.contains(placeholder.token()),
                "token {} survived substitution",
                placeholder.token()
            );
        }
    }

    #[test]
    fn synthesized_manifest_is_valid_json_with_expected_fields() {
        let manifest = synthesize(&metadata(), &template(), &files(), Utf8Path::new("dist"))
            .expect("synthesis succeeds");
        let value: serde_json::Value =
            serde_json::from_str(&manifest).expect("manifest parses as JSON");
        assert_eq!(value["name"], "demo");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["esmodules"][0], "src/demo.js");
        assert_eq!(value["styles"][0], "css/demo.css");
    }

    #[test]
    fn empty_discovery_fails_without_writing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out_dir = Utf8PathBuf::try_from(dir.path().join("dist")).expect("UTF-8 path");

        let err = write_manifest(
            &metadata(),
            &template(),
            &DiscoveredFiles::default(),
            &out_dir,
        )
        .expect_err("expected empty-discovery failure");

        assert!(matches!(err, PackagerError::NoFilesDiscovered { .. }));
        assert!(!out_dir.join(MANIFEST_FILE).exists(), "no write on failure");
    }

    #[test]
    fn guard_error_names_searched_directories() {
        let err = synthesize(
            &metadata(),
            &template(),
            &DiscoveredFiles::default(),
            Utf8Path::new("dist"),
        )
        .expect_err("expected empty-discovery failure");

        let PackagerError::NoFilesDiscovered {
            source_dir,
            style_dir,
        } = err
        else {
            panic!("unexpected error variant");
        };
        assert_eq!(source_dir, Utf8PathBuf::from("dist/src"));
        assert_eq!(style_dir, Utf8PathBuf::from("dist/css"));
    }

    #[test]
    fn discovery_order_is_preserved_not_sorted() {
        let files = DiscoveredFiles {
            scripts: vec![
                Utf8PathBuf::from("src/zeta.js"),
                Utf8PathBuf::from("src/alpha.js"),
            ],
            styles: vec![Utf8PathBuf::from("css/x.css")],
        };
        let manifest = synthesize(&metadata(), &template(), &files, Utf8Path::new("dist"))
            .expect("synthesis succeeds");

        let zeta = manifest.find("zeta.js").expect("zeta present");
        let alpha = manifest.find("alpha.js").expect("alpha present");
        assert!(zeta < alpha, "discovery order must survive rendering");
    }

    #[test]
    fn short_arrays_render_compact() {
        let rendered = render_path_array(&[Utf8PathBuf::from("src/demo.js")]);
        assert_eq!(rendered, "[\"src/demo.js\"]");
    }

    #[test]
    fn long_arrays_render_multiline_with_extra_tab() {
        let paths: Vec<Utf8PathBuf> = (0..6)
            .map(|i| Utf8PathBuf::from(format!("src/feature/very_long_module_name_{i}.js")))
            .collect();
        let rendered = render_path_array(&paths);

        assert!(rendered.starts_with("[\n\t\t"));
        assert!(rendered.ends_with("\n\t]"));
        for line in rendered.lines().skip(1) {
            assert!(line.starts_with('\t'), "every continuation line is re-indented");
        }
    }

    #[test]
    fn array_elements_are_json_escaped() {
        let rendered = render_path_array(&[Utf8PathBuf::from("src/a\"b.js")]);
        assert_eq!(rendered, "[\"src/a\\\"b.js\"]");
    }

    #[test]
    fn manifest_with_quoted_filename_still_parses() {
        let files = DiscoveredFiles {
            scripts: vec![Utf8PathBuf::from("src/a\"b.js")],
            styles: vec![Utf8PathBuf::from("css/demo.css")],
        };
        let manifest = synthesize(&metadata(), &template(), &files, Utf8Path::new("dist"))
            .expect("synthesis succeeds");
        let value: serde_json::Value =
            serde_json::from_str(&manifest).expect("manifest parses as JSON");
        assert_eq!(value["esmodules"][0], "src/a\"b.js");
    }

    #[rstest]
    #[case::scalar(Placeholder::Name, "{{name}}")]
    #[case::quoted_array(Placeholder::Sources, "\"{{sources}}\"")]
    fn tokens_include_quotes_only_for_arrays(
        #[case] placeholder: Placeholder,
        #[case] expected: &str,
    ) {
        assert_eq!(placeholder.token(), expected);
    }

    #[test]
    fn discover_outputs_scans_post_build_layout() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
        std::fs::create_dir_all(out.join("src")).expect("create dirs");
        std::fs::create_dir_all(out.join("css")).expect("create dirs");
        std::fs::write(out.join("src/demo.js"), "").expect("write file");
        std::fs::write(out.join("src/demo.d.ts"), "").expect("write file");
        std::fs::write(out.join("css/demo.css"), "").expect("write file");

        let found = discover_outputs(&out).expect("discovery succeeds");
        assert_eq!(found.scripts, vec![Utf8PathBuf::from("src/demo.js")]);
        assert_eq!(found.styles, vec![Utf8PathBuf::from("css/demo.css")]);
    }
}
