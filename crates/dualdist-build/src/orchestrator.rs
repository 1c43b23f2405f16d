//! Build orchestration across the primary package and its integrations
//!
//! Full mode runs one target after another in declared order and stops at the
//! first failure. Fast mode starts every target at once; stages inside each
//! target still run in order.

use crate::error::{BuildError, BuildResult};
use crate::integration::IntegrationBuilder;
use crate::mode::BuildMode;
use crate::package::PackageBuilder;
use crate::pipeline::{Pipeline, StageExecutor};
use crate::targets::{BuildTarget, Workspace};
use crate::toolchain::Toolchain;
use dualdist_config::Config;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Timing for one finished target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub name: String,
    pub stages: usize,
    pub elapsed: Duration,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: BuildMode,
    /// Finished targets in declared order
    pub targets: Vec<TargetReport>,
    pub total_time: Duration,
}

/// Owns the target list and decides how targets are scheduled
#[derive(Debug, Clone)]
pub struct Orchestrator {
    workspace: Workspace,
    toolchain: Toolchain,
    mode: BuildMode,
    /// Print a `Building <target>` line to stdout as each target starts
    progress: bool,
}

impl Orchestrator {
    pub fn new(workspace: Workspace, toolchain: Toolchain, mode: BuildMode) -> Self {
        Self {
            workspace,
            toolchain,
            mode,
            progress: true,
        }
    }

    /// Orchestrator for the targets and tools of a loaded configuration
    pub fn from_config(config: &Config, mode: BuildMode) -> Self {
        Self::new(
            Workspace::from_config(config),
            Toolchain::from_config(&config.project),
            mode,
        )
    }

    /// Print or suppress the per-target progress lines
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// One pipeline per target: the primary package first, then each
    /// integration in declared order
    pub fn plan(&self) -> Vec<Pipeline> {
        let root = self.workspace.root.as_path();
        let primary = self.workspace.primary.name.as_str();

        self.workspace
            .targets()
            .iter()
            .map(|target| match target {
                BuildTarget::Primary(package) => {
                    PackageBuilder::new(root, package, &self.toolchain).plan(self.mode)
                }
                BuildTarget::Integration(integration) => {
                    IntegrationBuilder::new(root, integration, primary, &self.toolchain)
                        .plan(self.mode)
                }
            })
            .collect()
    }

    /// Build every target
    pub fn run<E: StageExecutor + ?Sized>(&self, executor: &E) -> BuildResult<BuildReport> {
        let start = Instant::now();
        let pipelines = self.plan();

        tracing::debug!(
            "building {} target(s) in {} mode",
            pipelines.len(),
            self.mode
        );

        let targets = if self.mode.is_fast() {
            run_concurrent(&pipelines, executor, self.progress)?
        } else {
            run_sequential(&pipelines, executor, self.progress)?
        };

        Ok(BuildReport {
            mode: self.mode,
            targets,
            total_time: start.elapsed(),
        })
    }
}

/// Target `i + 1` starts only after every stage of target `i` succeeded
fn run_sequential<E: StageExecutor + ?Sized>(
    pipelines: &[Pipeline],
    executor: &E,
    progress: bool,
) -> BuildResult<Vec<TargetReport>> {
    let mut reports = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        reports.push(run_target(pipeline, executor, progress)?);
    }
    Ok(reports)
}

/// Every target gets its own worker. All targets run to completion; each
/// failure is logged and the first one in declared order is returned.
fn run_concurrent<E: StageExecutor + ?Sized>(
    pipelines: &[Pipeline],
    executor: &E,
    progress: bool,
) -> BuildResult<Vec<TargetReport>> {
    if pipelines.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pipelines.len())
        .thread_name(|index| format!("dualdist-target-{}", index))
        .build()
        .map_err(|e| BuildError::ThreadPool(e.to_string()))?;

    let results: Vec<BuildResult<TargetReport>> = pool.install(|| {
        pipelines
            .par_iter()
            .with_max_len(1)
            .map(|pipeline| run_target(pipeline, executor, progress))
            .collect()
    });

    results.into_iter().collect()
}

fn run_target<E: StageExecutor + ?Sized>(
    pipeline: &Pipeline,
    executor: &E,
    progress: bool,
) -> BuildResult<TargetReport> {
    if progress {
        println!("Building {}", pipeline.name);
    }
    let start = Instant::now();

    if let Err(err) = pipeline.run(executor) {
        tracing::error!("{} failed: {}", pipeline.name, err);
        return Err(err);
    }

    Ok(TargetReport {
        name: pipeline.name.clone(),
        stages: pipeline.stages.len(),
        elapsed: start.elapsed(),
    })
}
