//! Ordered build stages and the executors that run them
//!
//! A [`Pipeline`] is the complete plan for one build target. Stages run in
//! order; each one runs to completion before the next starts and the first
//! failure aborts the rest of the pipeline.

use crate::error::{BuildError, BuildResult};
use crate::renamer::rename_modules;
use crate::runner::{CommandRunner, ShellCommand, ShellRunner};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single step of a target build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum Stage {
    /// Remove a directory tree; a missing directory is not an error
    Clean { dir: PathBuf },
    /// Run an external tool
    Command(ShellCommand),
    /// Retag compiled modules under `root` from `from` to `to`
    RenameModules {
        root: PathBuf,
        from: String,
        to: String,
    },
}

impl Stage {
    /// Short stage label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean { .. } => "clean",
            Self::Command(command) => command.kind.name(),
            Self::RenameModules { .. } => "rename",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean { dir } => write!(f, "clean {}", dir.display()),
            Self::Command(command) => write!(f, "{}: {}", command.kind, command),
            Self::RenameModules { root, from, to } => {
                write!(f, "rename *{} -> *{} under {}", from, to, root.display())
            }
        }
    }
}

/// Runs one stage to completion or fails
pub trait StageExecutor: Send + Sync {
    fn execute(&self, stage: &Stage) -> BuildResult<()>;
}

/// The ordered stages that build one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    /// Target name shown in progress output
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Append a stage
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append a command stage
    pub fn command(self, command: ShellCommand) -> Self {
        self.stage(Stage::Command(command))
    }

    /// Run every stage in order, stopping at the first failure
    pub fn run<E: StageExecutor + ?Sized>(&self, executor: &E) -> BuildResult<()> {
        let total = self.stages.len();
        for (index, stage) in self.stages.iter().enumerate() {
            tracing::debug!("[{}] stage {}/{}: {}", self.name, index + 1, total, stage);
            executor.execute(stage)?;
        }
        Ok(())
    }
}

/// Executes stages against the real filesystem and toolchain
#[derive(Debug, Clone, Default)]
pub struct HostExecutor<R = ShellRunner> {
    runner: R,
}

impl<R: CommandRunner> HostExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> StageExecutor for HostExecutor<R> {
    fn execute(&self, stage: &Stage) -> BuildResult<()> {
        match stage {
            Stage::Clean { dir } => remove_dir_if_present(dir),
            Stage::Command(command) => self.runner.run(command),
            Stage::RenameModules { root, from, to } => rename_modules(root, from, to).map(|_| ()),
        }
    }
}

fn remove_dir_if_present(dir: &Path) -> BuildResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::io(dir, e)),
    }
}

/// Prints stages instead of running them
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl StageExecutor for DryRunExecutor {
    fn execute(&self, stage: &Stage) -> BuildResult<()> {
        println!("  {}", stage);
        Ok(())
    }
}
