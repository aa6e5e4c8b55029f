//! CLI argument definitions for the bindery packager.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Build and package a host-loadable module.
#[derive(Parser, Debug)]
#[command(name = "bindery")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build and package a host-loadable module.\n\n",
    "Bindery compiles the module's sources, synthesizes its manifest from the ",
    "module.json template plus the discovered output files, copies static ",
    "assets (localization files, templates, stylesheets, license, readme), ",
    "and can compress the result into a distributable archive.\n\n",
    "With no subcommand, the default build writes to the local dist/ ",
    "directory.",
))]
#[command(after_help = concat!(
    "TARGETS:\n",
    "  build     Write the build output to dist/ (default)\n",
    "  dev       Write the build output to $BINDERY_MODULES_DIR/<name>/\n",
    "  bundle    Build, then produce package/<name>.zip plus a manifest copy\n\n",
    "EXAMPLES:\n",
    "  Build into dist/:\n",
    "    $ bindery\n\n",
    "  Build into the host's modules directory:\n",
    "    $ BINDERY_MODULES_DIR=~/host/modules bindery dev\n\n",
    "  Produce a release bundle:\n",
    "    $ bindery bundle\n\n",
    "  Use an external compiler command:\n",
    "    $ bindery build --compiler my-compiler",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Build arguments (used when no subcommand is given).
    #[command(flatten)]
    pub build: BuildArgs,
}

/// Available build targets.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build into the local distribution directory (default).
    Build(BuildArgs),

    /// Build into the host's external modules directory.
    Dev(BuildArgs),

    /// Build, stage, and compress a release bundle.
    Bundle(BuildArgs),
}

/// Arguments shared by every build target.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Root directory of the module project.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: Utf8PathBuf,

    /// External compiler command, run as `CMD <src-dir> <out-dir>`
    /// [default: copy sources, renaming .ts to .js].
    #[arg(long, value_name = "CMD")]
    pub compiler: Option<String>,

    /// Suppress progress output.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,

    /// Increase diagnostic verbosity (can be repeated).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::from("."),
            compiler: None,
            quiet: false,
            verbosity: 0,
        }
    }
}
