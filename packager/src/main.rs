//! Bindery CLI entrypoint.
//!
//! Dispatches the requested build target to the orchestrator and maps the
//! result to a process exit status. All progress and error output goes to
//! stderr; the exit code is the only structured result.

use bindery_packager::cli::{BuildArgs, Cli, Command};
use bindery_packager::compiler::{CommandCompiler, CopyCompiler, SourceCompiler};
use bindery_packager::error::Result;
use bindery_packager::layout::ProjectLayout;
use bindery_packager::metadata::ModuleMetadata;
use bindery_packager::orchestrator::{BuildContext, Orchestrator};
use bindery_packager::output::write_stderr_line;
use clap::Parser;
use std::io::Write;

/// The build target selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Build,
    Dev,
    Bundle,
}

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let (target, args) = select_target(cli);

    let layout = ProjectLayout::new(args.project_root.clone());
    let metadata = ModuleMetadata::load(&layout.descriptor_file())?;
    let compiler = select_compiler(args);

    let context = BuildContext {
        layout: &layout,
        metadata: &metadata,
        compiler: compiler.as_ref(),
        quiet: args.quiet,
        verbosity: args.verbosity,
    };
    let mut orchestrator = Orchestrator::new(context);

    match target {
        Target::Build => orchestrator.run_build(stderr),
        Target::Dev => orchestrator.run_dev(stderr),
        Target::Bundle => orchestrator.run_bundle(stderr),
    }
}

/// Resolve the target and its arguments; no subcommand means default build.
fn select_target(cli: &Cli) -> (Target, &BuildArgs) {
    match &cli.command {
        Some(Command::Build(args)) => (Target::Build, args),
        Some(Command::Dev(args)) => (Target::Dev, args),
        Some(Command::Bundle(args)) => (Target::Bundle, args),
        None => (Target::Build, &cli.build),
    }
}

/// Choose the compiler collaborator from the CLI flags.
fn select_compiler(args: &BuildArgs) -> Box<dyn SourceCompiler> {
    match &args.compiler {
        Some(program) => Box::new(CommandCompiler::new(program.clone())),
        None => Box::new(CopyCompiler),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
