//! Task graph construction and scheduling.
//!
//! A build plan is a sequence of phases computed from explicitly declared
//! task dependencies. Manifest synthesis declares data dependencies on the
//! compile and style-copy tasks, so the topological schedule places it in a
//! later phase and it always observes the fully materialized output tree.
//! Tasks within one phase write to disjoint output paths and may run
//! concurrently.

use crate::error::{PackagerError, Result};
use crate::layout::ProjectLayout;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::fmt;

/// Identifier for each task in a build plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Compile `src/` into the output root.
    CompileSource,
    /// Copy stylesheets into the output root.
    CopyStyles,
    /// Copy localization files into the output root.
    CopyLanguages,
    /// Copy HTML templates into the output root.
    CopyTemplates,
    /// Copy the license and readme into the output root.
    CopyMeta,
    /// Discover output files and write the manifest.
    SynthesizeManifest,
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CompileSource => "compile-source",
            Self::CopyStyles => "copy-styles",
            Self::CopyLanguages => "copy-languages",
            Self::CopyTemplates => "copy-templates",
            Self::CopyMeta => "copy-meta",
            Self::SynthesizeManifest => "synthesize-manifest",
        };
        write!(f, "{name}")
    }
}

/// The filesystem operation a task performs.
#[derive(Debug, Clone)]
pub enum TaskAction {
    /// Run the source compiler collaborator.
    Compile,
    /// Discover post-build files and synthesize the manifest.
    Manifest,
    /// Copy a directory tree verbatim.
    CopyTree {
        /// Source directory.
        source: Utf8PathBuf,
        /// Destination directory under the output root.
        dest: Utf8PathBuf,
    },
    /// Copy individual files into a directory.
    CopyFiles {
        /// Files to copy.
        sources: Vec<Utf8PathBuf>,
        /// Destination directory.
        dest: Utf8PathBuf,
    },
}

/// One schedulable unit of work.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Tasks whose output this task reads.
    pub needs: Vec<TaskId>,
    /// The operation to perform.
    pub action: TaskAction,
    /// Paths (files or subtrees) this task writes.
    pub outputs: Vec<Utf8PathBuf>,
}

/// A scheduled build plan for one target.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Output root the plan writes into.
    pub out_dir: Utf8PathBuf,
    /// Phases in execution order; tasks within a phase are unordered.
    pub phases: Vec<Vec<Task>>,
}

/// Build the task plan for a target rooted at `out_dir`.
///
/// # Errors
///
/// Returns [`PackagerError::PlanInvalid`] if the dependency graph cannot be
/// scheduled or a phase contains overlapping outputs.
pub fn plan_build(layout: &ProjectLayout, out_dir: Utf8PathBuf) -> Result<BuildPlan> {
    let tasks = target_tasks(layout, &out_dir);
    let phases = schedule(tasks)?;
    for phase in &phases {
        verify_disjoint_outputs(phase)?;
    }
    Ok(BuildPlan { out_dir, phases })
}

/// The fixed task set for a build target.
fn target_tasks(layout: &ProjectLayout, out_dir: &Utf8Path) -> Vec<Task> {
    use crate::layout::{LANG_DIR, SOURCE_DIR, STYLE_DIR, TEMPLATES_DIR};

    let meta_outputs = crate::layout::META_FILES
        .iter()
        .map(|f| out_dir.join(f))
        .collect();

    vec![
        Task {
            id: TaskId::CompileSource,
            needs: vec![],
            action: TaskAction::Compile,
            outputs: vec![out_dir.join(SOURCE_DIR)],
        },
        Task {
            id: TaskId::CopyStyles,
            needs: vec![],
            action: TaskAction::CopyTree {
                source: layout.style_dir(),
                dest: out_dir.join(STYLE_DIR),
            },
            outputs: vec![out_dir.join(STYLE_DIR)],
        },
        Task {
            id: TaskId::CopyLanguages,
            needs: vec![],
            action: TaskAction::CopyTree {
                source: layout.lang_dir(),
                dest: out_dir.join(LANG_DIR),
            },
            outputs: vec![out_dir.join(LANG_DIR)],
        },
        Task {
            id: TaskId::CopyTemplates,
            needs: vec![],
            action: TaskAction::CopyTree {
                source: layout.template_dir(),
                dest: out_dir.join(TEMPLATES_DIR),
            },
            outputs: vec![out_dir.join(TEMPLATES_DIR)],
        },
        Task {
            id: TaskId::CopyMeta,
            needs: vec![],
            action: TaskAction::CopyFiles {
                sources: layout.meta_files(),
                dest: out_dir.to_owned(),
            },
            outputs: meta_outputs,
        },
        Task {
            id: TaskId::SynthesizeManifest,
            needs: vec![TaskId::CompileSource, TaskId::CopyStyles],
            action: TaskAction::Manifest,
            outputs: vec![out_dir.join(crate::layout::MANIFEST_FILE)],
        },
    ]
}

/// Layer tasks topologically: each phase contains every task whose
/// dependencies completed in earlier phases.
///
/// # Errors
///
/// Returns [`PackagerError::PlanInvalid`] on a dependency cycle or an edge
/// to an unknown task.
pub fn schedule(mut tasks: Vec<Task>) -> Result<Vec<Vec<Task>>> {
    let known: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();
    for task in &tasks {
        if let Some(missing) = task.needs.iter().find(|n| !known.contains(n)) {
            return Err(PackagerError::PlanInvalid {
                reason: format!("{} depends on unknown task {missing}", task.id),
            });
        }
    }

    let mut phases = Vec::new();
    let mut done: HashSet<TaskId> = HashSet::new();
    while !tasks.is_empty() {
        let (ready, blocked): (Vec<Task>, Vec<Task>) = tasks
            .into_iter()
            .partition(|t| t.needs.iter().all(|n| done.contains(n)));
        if ready.is_empty() {
            let stuck: Vec<String> = blocked.iter().map(|t| t.id.to_string()).collect();
            return Err(PackagerError::PlanInvalid {
                reason: format!("dependency cycle among: {}", stuck.join(", ")),
            });
        }
        done.extend(ready.iter().map(|t| t.id));
        phases.push(ready);
        tasks = blocked;
    }
    Ok(phases)
}

/// Verify that no two tasks in a phase write overlapping paths.
///
/// Overlap means one output path equals or is an ancestor of another, which
/// would let nominally independent tasks race on the same files.
///
/// # Errors
///
/// Returns [`PackagerError::PlanInvalid`] naming the conflicting tasks.
pub fn verify_disjoint_outputs(phase: &[Task]) -> Result<()> {
    for (i, a) in phase.iter().enumerate() {
        for b in phase.iter().skip(i + 1) {
            for out_a in &a.outputs {
                for out_b in &b.outputs {
                    if out_a.starts_with(out_b) || out_b.starts_with(out_a) {
                        return Err(PackagerError::PlanInvalid {
                            reason: format!(
                                "{} and {} both write under {out_a}",
                                a.id, b.id
                            ),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
