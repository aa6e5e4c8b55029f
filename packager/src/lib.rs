//! Bindery packager library.
//!
//! This crate provides the core functionality for building and packaging a
//! host-loadable module: compiling sources through a collaborator seam,
//! synthesizing the distribution manifest from a template plus discovered
//! file lists, copying static assets, and compressing release bundles. It is
//! used by the `bindery` CLI binary and can be consumed programmatically for
//! testing or custom build workflows.
//!
//! # Modules
//!
//! - [`assets`] - Verbatim asset copying into output trees
//! - [`bundle`] - Release staging, compression, and manifest finalization
//! - [`cli`] - Command-line argument definitions
//! - [`compiler`] - Source compilation collaborator seam
//! - [`discovery`] - Pure recursive file enumeration
//! - [`error`] - Semantic error types
//! - [`layout`] - Fixed project directory conventions
//! - [`manifest`] - Manifest template substitution and synthesis
//! - [`metadata`] - Package descriptor loading and validation
//! - [`orchestrator`] - Target execution with phased concurrency
//! - [`output`] - Progress output formatting
//! - [`tasks`] - Task graph construction and topological scheduling

pub mod assets;
pub mod bundle;
pub mod cli;
pub mod compiler;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod metadata;
pub mod orchestrator;
pub mod output;
pub mod tasks;
