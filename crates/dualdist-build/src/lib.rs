//! dualdist build orchestration
//!
//! Builds a primary package and the integrations that consume it:
//! - Two-pass compilation of the primary package into one output tree
//! - Retagging first-pass modules so both module formats ship side by side
//! - Declaration generation and local package linking
//! - Sequential (full) or concurrent (fast) execution of build targets
//!
//! Every build target is planned as a [`Pipeline`] of [`Stage`]s and executed
//! by a [`StageExecutor`], so the same plan can run against the host, be
//! printed as a dry run, or be recorded in tests.

pub mod error;
pub mod integration;
pub mod mode;
pub mod orchestrator;
pub mod package;
pub mod pipeline;
pub mod renamer;
pub mod runner;
pub mod targets;
pub mod toolchain;

// Re-export main types
pub use error::{BuildError, BuildResult};
pub use integration::IntegrationBuilder;
pub use mode::BuildMode;
pub use orchestrator::{BuildReport, Orchestrator, TargetReport};
pub use package::PackageBuilder;
pub use pipeline::{DryRunExecutor, HostExecutor, Pipeline, Stage, StageExecutor};
pub use renamer::rename_modules;
pub use runner::{CommandKind, CommandRunner, OutputMode, ShellCommand, ShellRunner};
pub use targets::{BuildTarget, IntegrationTarget, PrimaryTarget, Workspace};
pub use toolchain::Toolchain;
