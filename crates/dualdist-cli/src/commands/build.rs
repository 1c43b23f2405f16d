//! Build command - compile the primary package and its integrations

use anyhow::{Context, Result};
use colored::Colorize;
use dualdist_build::{
    BuildMode, BuildReport, DryRunExecutor, HostExecutor, Orchestrator, Pipeline,
};
use dualdist_config::{Config, ConfigLoader};
use std::path::PathBuf;

/// Build command arguments
#[derive(Debug, Default)]
pub struct BuildArgs {
    /// Concurrent build without install, link, rename or declaration steps
    pub fast: bool,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Print stages instead of running them
    pub dry_run: bool,
    /// JSON output
    pub json: bool,
    /// Suppress the summary
    pub quiet: bool,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mode = BuildMode::from_fast(args.fast);
    // stdout carries nothing but the report in JSON mode
    let orchestrator = Orchestrator::from_config(&config, mode).with_progress(!args.json);

    if args.dry_run {
        return print_plan(&orchestrator.plan(), args.json);
    }

    let executor: HostExecutor = HostExecutor::default();
    let report = orchestrator.run(&executor).context("Build failed")?;

    if args.json {
        println!("{}", report_json(&report));
    } else if !args.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Load the configuration named on the command line, or search for one
fn load_config(args: &BuildArgs) -> Result<Config> {
    let loader = ConfigLoader::new();

    let config = match &args.config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            loader
                .load_from_directory(&cwd)
                .context("Failed to load dualdist.toml")?
        }
    };

    match &config.source_file {
        Some(path) => tracing::debug!("using configuration from {}", path.display()),
        None => tracing::debug!(
            "no dualdist.toml found, using the default layout at {}",
            config.project_root.display()
        ),
    }

    Ok(config)
}

fn print_plan(plan: &[Pipeline], json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(plan).context("Failed to render plan")?;
        println!("{}", rendered);
        return Ok(());
    }

    for pipeline in plan {
        println!("{}", pipeline.name.bold());
        pipeline
            .run(&DryRunExecutor)
            .with_context(|| format!("Failed to print plan for {}", pipeline.name))?;
    }
    Ok(())
}

fn report_json(report: &BuildReport) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "mode": report.mode.name(),
        "total_time": report.total_time.as_secs_f64(),
        "targets": report
            .targets
            .iter()
            .map(|target| {
                serde_json::json!({
                    "name": target.name,
                    "stages": target.stages,
                    "time": target.elapsed.as_secs_f64(),
                })
            })
            .collect::<Vec<_>>(),
    })
}

fn print_summary(report: &BuildReport) {
    println!("\n{}", "=".repeat(60));
    println!(
        "{} in {:.2}s ({} mode)",
        "Build succeeded".green().bold(),
        report.total_time.as_secs_f64(),
        report.mode
    );
    println!("{}", "=".repeat(60));
    for target in &report.targets {
        println!(
            "  {:<48} {:>6.2}s",
            target.name,
            target.elapsed.as_secs_f64()
        );
    }
    println!("{}", "=".repeat(60));
}
