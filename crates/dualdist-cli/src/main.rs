use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Build a primary package and the integrations that depend on it.
///
/// In full mode (the default) the primary package is compiled twice into one
/// output tree, once per module format, its declarations are generated and it
/// is linked locally. Each integration is then installed, linked against the
/// fresh primary package, compiled and given declarations, one target after
/// another.
///
/// With --fast every target builds at the same time and only the second
/// module format is produced: no install, link, rename or declaration steps.
///
/// EXAMPLES:
///     dualdist                        Full build of every target
///     dualdist --fast                 Quick concurrent build for development
///     dualdist --dry-run              Show the planned stages
///     dualdist --config ci.toml       Use a specific configuration file
///
/// ENVIRONMENT VARIABLES:
///     DUALDIST_COMPILER          Override the compiler command
///     DUALDIST_DECLARATIONS      Override the declaration generator command
///     DUALDIST_PACKAGE_MANAGER   Override the package manager command
///     DUALDIST_JSON              Set to 'true' for JSON output by default
///     RUST_LOG                   Diagnostic logging (e.g. RUST_LOG=debug)
///     NO_COLOR                   Disable colored output
#[derive(Parser, Debug)]
#[command(name = "dualdist")]
#[command(version)]
struct Cli {
    /// Build every target concurrently and skip install, link, rename and declaration steps
    #[arg(long)]
    fast: bool,

    /// Path to dualdist.toml (default: search upward from the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the planned stages without running anything
    #[arg(long)]
    dry_run: bool,

    /// Output the plan or build summary as JSON
    #[arg(long, env = "DUALDIST_JSON")]
    json: bool,

    /// Suppress the build summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout only carries progress and summaries
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let args = commands::build::BuildArgs {
        fast: cli.fast,
        config: cli.config,
        dry_run: cli.dry_run,
        json: cli.json,
        quiet: cli.quiet,
    };

    match commands::build::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", "Unhandled error:".red().bold());
            eprintln!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_full_build() {
        let cli = Cli::try_parse_from(["dualdist"]).unwrap();
        assert!(!cli.fast);
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_fast_flag() {
        let cli = Cli::try_parse_from(["dualdist", "--fast"]).unwrap();
        assert!(cli.fast);
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["dualdist", "-c", "ci/dualdist.toml", "--dry-run"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ci/dualdist.toml")));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["dualdist", "--faster"]).is_err());
    }
}
