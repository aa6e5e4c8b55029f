//! Build orchestration across the three named targets.
//!
//! The orchestrator executes a scheduled [`BuildPlan`](crate::tasks::BuildPlan):
//! a cleanup step, then
//! each phase in sequence with the phase's tasks running on scoped threads.
//! The scope join is the barrier between phases, so a dependent phase never
//! observes a partially written output tree. Any task failure aborts the
//! invocation; files already written stay on disk, and a re-run starts by
//! cleaning the output root again.

use crate::assets;
use crate::bundle;
use crate::compiler::SourceCompiler;
use crate::error::Result;
use crate::layout::{ProjectLayout, SOURCE_DIR, dev_output_dir};
use crate::manifest::{ManifestTemplate, discover_outputs, write_manifest};
use crate::metadata::ModuleMetadata;
use crate::output::{build_success_message, bundle_success_message, write_stderr_line};
use crate::tasks::{Task, TaskAction, plan_build};
use camino::Utf8Path;
use std::io::Write;

/// Lifecycle of one orchestrator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No invocation started yet.
    Idle,
    /// Deleting the pre-existing output tree.
    Cleaning,
    /// Running the parallel build phases.
    BuildingParallel,
    /// Copying the distribution into the name-qualified subdirectory.
    Staging,
    /// Compressing the staged subdirectory.
    Compressing,
    /// Copying the manifest next to the archive.
    FinalizingManifest,
    /// Deleting the staging subdirectory.
    CleaningIntermediate,
    /// Invocation completed successfully.
    Done,
    /// Invocation aborted; partial output remains on disk.
    Failed,
}

/// Shared inputs for one orchestrator invocation.
pub struct BuildContext<'a> {
    /// Project layout conventions.
    pub layout: &'a ProjectLayout,
    /// Validated module metadata.
    pub metadata: &'a ModuleMetadata,
    /// Source compilation collaborator.
    pub compiler: &'a dyn SourceCompiler,
    /// Suppress progress output.
    pub quiet: bool,
    /// Diagnostic verbosity level (0 = normal, 1+ = per-task detail).
    pub verbosity: u8,
}

/// Executes build plans for the named targets.
pub struct Orchestrator<'a> {
    context: BuildContext<'a>,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator in the idle state.
    #[must_use]
    pub fn new(context: BuildContext<'a>) -> Self {
        Self {
            context,
            state: RunState::Idle,
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the default build into the local distribution directory.
    ///
    /// # Errors
    ///
    /// Propagates the first task failure; the state moves to
    /// [`RunState::Failed`] and already-written files remain.
    pub fn run_build(&mut self, stderr: &mut dyn Write) -> Result<()> {
        let out_dir = self.context.layout.dist_dir();
        self.finish(|this| {
            this.execute_build(&out_dir, stderr)?;
            if !this.context.quiet {
                write_stderr_line(stderr, build_success_message(&out_dir));
            }
            Ok(())
        })
    }

    /// Run the dev build into the host's external modules directory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PackagerError::MissingConfiguration`] when
    /// the modules directory variable is unset; otherwise as
    /// [`Self::run_build`].
    pub fn run_dev(&mut self, stderr: &mut dyn Write) -> Result<()> {
        self.finish(|this| {
            let out_dir = dev_output_dir(&this.context.metadata.name)?;
            this.execute_build(&out_dir, stderr)?;
            if !this.context.quiet {
                write_stderr_line(stderr, build_success_message(&out_dir));
            }
            Ok(())
        })
    }

    /// Run the release bundle: default build, stage, compress, finalize.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from any stage; no rollback occurs.
    pub fn run_bundle(&mut self, stderr: &mut dyn Write) -> Result<()> {
        let dist_dir = self.context.layout.dist_dir();
        let bundle_dir = self.context.layout.bundle_dir();
        let module_name = self.context.metadata.name.clone();

        self.finish(|this| {
            this.execute_build(&dist_dir, stderr)?;

            this.advance(RunState::Staging);
            let staged_dir = bundle::stage_distribution(&dist_dir, &module_name)?;

            this.advance(RunState::Compressing);
            let archive = bundle::compress_staged(&staged_dir, &module_name, &bundle_dir)?;

            this.advance(RunState::FinalizingManifest);
            bundle::copy_bundle_manifest(&dist_dir, &bundle_dir)?;

            this.advance(RunState::CleaningIntermediate);
            bundle::remove_staging(&staged_dir)?;

            if !this.context.quiet {
                write_stderr_line(stderr, bundle_success_message(&archive));
            }
            Ok(())
        })
    }

    /// Clean and execute the phased build plan for one output root.
    ///
    /// Leaves the state at [`RunState::BuildingParallel`] so bundle stages
    /// can follow.
    fn execute_build(&mut self, out_dir: &Utf8Path, stderr: &mut dyn Write) -> Result<()> {
        let plan = plan_build(self.context.layout, out_dir.to_owned())?;

        self.advance(RunState::Cleaning);
        if !self.context.quiet {
            write_stderr_line(stderr, format!("Cleaning {out_dir}..."));
        }
        clean_output_root(&plan.out_dir)?;

        self.advance(RunState::BuildingParallel);
        for phase in &plan.phases {
            if !self.context.quiet {
                let names: Vec<String> = phase.iter().map(|t| t.id.to_string()).collect();
                write_stderr_line(stderr, format!("Running: {}", names.join(", ")));
                if self.context.verbosity > 0 {
                    for task in phase {
                        let outputs: Vec<&str> =
                            task.outputs.iter().map(|o| o.as_str()).collect();
                        write_stderr_line(
                            stderr,
                            format!("  {} -> {}", task.id, outputs.join(", ")),
                        );
                    }
                }
            }
            self.run_phase(phase, &plan.out_dir)?;
        }
        Ok(())
    }

    /// Run every task in a phase concurrently and join them all.
    ///
    /// The first error is returned only after every task in the phase has
    /// completed, preserving the barrier semantic.
    fn run_phase(&self, phase: &[Task], out_dir: &Utf8Path) -> Result<()> {
        let mut results = Vec::with_capacity(phase.len());
        std::thread::scope(|scope| {
            let handles: Vec<_> = phase
                .iter()
                .map(|task| scope.spawn(move || self.run_task(task, out_dir)))
                .collect();
            for handle in handles {
                match handle.join() {
                    Ok(result) => results.push(result),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });
        results.into_iter().collect()
    }

    /// Execute a single task against the output root.
    fn run_task(&self, task: &Task, out_dir: &Utf8Path) -> Result<()> {
        log::debug!("task {} starting", task.id);
        let result = match &task.action {
            TaskAction::Compile => self.context.compiler.compile(
                &self.context.layout.source_dir(),
                &out_dir.join(SOURCE_DIR),
            ),
            TaskAction::Manifest => self.synthesize_manifest(out_dir),
            TaskAction::CopyTree { source, dest } => {
                assets::copy_tree(source, dest).map(|_| ())
            }
            TaskAction::CopyFiles { sources, dest } => {
                assets::copy_files(sources, dest).map(|_| ())
            }
        };
        match &result {
            Ok(()) => log::debug!("task {} finished", task.id),
            Err(e) => log::debug!("task {} failed: {e}", task.id),
        }
        result
    }

    /// Load the template, discover the post-build layout, write the manifest.
    fn synthesize_manifest(&self, out_dir: &Utf8Path) -> Result<()> {
        let template = ManifestTemplate::load(&self.context.layout.manifest_template())?;
        let files = discover_outputs(out_dir)?;
        write_manifest(self.context.metadata, &template, &files, out_dir)?;
        Ok(())
    }

    /// Record a state transition.
    fn advance(&mut self, next: RunState) {
        log::debug!("state: {:?} -> {next:?}", self.state);
        self.state = next;
    }

    /// Run an invocation body and settle the terminal state.
    fn finish(&mut self, body: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        match body(self) {
            Ok(()) => {
                self.advance(RunState::Done);
                Ok(())
            }
            Err(e) => {
                self.advance(RunState::Failed);
                Err(e)
            }
        }
    }
}

/// Delete a build output tree.
///
/// Idempotent: cleaning an already-absent directory succeeds, so repeated
/// runs always start from the same empty state.
///
/// # Errors
///
/// Propagates any I/O failure other than the directory being absent.
pub fn clean_output_root(out_dir: &Utf8Path) -> Result<()> {
    match std::fs::remove_dir_all(out_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CopyCompiler;
    use camino::Utf8PathBuf;
    use std::fs;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp path is UTF-8")
    }

    fn metadata() -> ModuleMetadata {
        ModuleMetadata {
            name: "demo".to_owned(),
            title: "Demo".to_owned(),
            version: "1.0.0".to_owned(),
            description: "d".to_owned(),
            main: camino::Utf8PathBuf::from("src/module.ts"),
        }
    }

    fn scaffold_project(root: &Utf8Path) {
        fs::create_dir_all(root.join("src")).expect("create dirs");
        fs::create_dir_all(root.join("css")).expect("create dirs");
        fs::write(root.join("src/module.ts"), "export {};").expect("write file");
        fs::write(root.join("css/demo.css"), "a{}").expect("write file");
        fs::write(root.join("LICENSE"), "ISC").expect("write file");
        fs::write(root.join("README.md"), "# demo").expect("write file");
        fs::write(
            root.join("module.json"),
            concat!(
                "{\n",
                "\t\"name\": \"{{name}}\",\n",
                "\t\"title\": \"{{title}}\",\n",
                "\t\"version\": \"{{version}}\",\n",
                "\t\"description\": \"{{description}}\",\n",
                "\t\"esmodules\": \"{{sources}}\",\n",
                "\t\"styles\": \"{{css}}\"\n",
                "}\n",
            ),
        )
        .expect("write template");
    }

    #[test]
    fn clean_output_root_is_idempotent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = utf8_root(&dir).join("dist");
        fs::create_dir_all(out.join("src")).expect("create dirs");

        clean_output_root(&out).expect("first clean succeeds");
        assert!(!out.exists());
        clean_output_root(&out).expect("second clean is a no-op");
        assert!(!out.exists());
    }

    #[test]
    fn successful_build_reaches_done() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&dir);
        scaffold_project(&root);

        let layout = ProjectLayout::new(root.clone());
        let meta = metadata();
        let compiler = CopyCompiler;
        let mut orchestrator = Orchestrator::new(BuildContext {
            layout: &layout,
            metadata: &meta,
            compiler: &compiler,
            quiet: true,
            verbosity: 0,
        });

        let mut stderr = Vec::new();
        orchestrator
            .run_build(&mut stderr)
            .expect("build succeeds");

        assert_eq!(orchestrator.state(), RunState::Done);
        assert!(root.join("dist/src/module.js").exists());
        assert!(root.join("dist/css/demo.css").exists());
        assert!(root.join("dist/module.json").exists());
        assert!(root.join("dist/LICENSE").exists());
    }

    #[test]
    fn failing_task_moves_to_failed_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&dir);
        scaffold_project(&root);
        // Removing the license makes the meta-copy task fail.
        fs::remove_file(root.join("LICENSE")).expect("remove license");

        let layout = ProjectLayout::new(root);
        let meta = metadata();
        let compiler = CopyCompiler;
        let mut orchestrator = Orchestrator::new(BuildContext {
            layout: &layout,
            metadata: &meta,
            compiler: &compiler,
            quiet: true,
            verbosity: 0,
        });

        let mut stderr = Vec::new();
        orchestrator
            .run_build(&mut stderr)
            .expect_err("meta copy must fail");
        assert_eq!(orchestrator.state(), RunState::Failed);
    }

    #[test]
    fn progress_output_respects_quiet_flag() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&dir);
        scaffold_project(&root);

        let layout = ProjectLayout::new(root);
        let meta = metadata();
        let compiler = CopyCompiler;
        let mut orchestrator = Orchestrator::new(BuildContext {
            layout: &layout,
            metadata: &meta,
            compiler: &compiler,
            quiet: false,
            verbosity: 0,
        });

        let mut stderr = Vec::new();
        orchestrator.run_build(&mut stderr).expect("build succeeds");

        let text = String::from_utf8_lossy(&stderr);
        assert!(text.contains("Cleaning"));
        assert!(text.contains("synthesize-manifest"));
        assert!(text.contains("Build complete"));
    }

    #[test]
    fn verbose_output_lists_task_output_paths() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&dir);
        scaffold_project(&root);

        let layout = ProjectLayout::new(root.clone());
        let meta = metadata();
        let compiler = CopyCompiler;
        let mut orchestrator = Orchestrator::new(BuildContext {
            layout: &layout,
            metadata: &meta,
            compiler: &compiler,
            quiet: false,
            verbosity: 1,
        });

        let mut stderr = Vec::new();
        orchestrator.run_build(&mut stderr).expect("build succeeds");

        let text = String::from_utf8_lossy(&stderr);
        assert!(text.contains(root.join("dist/src").as_str()));
        assert!(text.contains(root.join("dist/module.json").as_str()));
    }
}
