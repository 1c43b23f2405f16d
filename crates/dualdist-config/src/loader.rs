//! Configuration Loader
//!
//! Finds `dualdist.toml`, falls back to the built-in layout, and applies
//! environment overrides with proper precedence:
//! 1. Built-in default layout - lowest priority
//! 2. Project config (dualdist.toml) - replaces the default
//! 3. Environment variables (DUALDIST_*) - overrides project
//! 4. CLI flags - highest priority (handled by caller)

use crate::project::ProjectConfig;
use crate::{ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Overrides the compiler executable
pub const ENV_COMPILER: &str = "DUALDIST_COMPILER";
/// Overrides the declaration generator executable
pub const ENV_DECLARATIONS: &str = "DUALDIST_DECLARATIONS";
/// Overrides the package manager executable
pub const ENV_PACKAGE_MANAGER: &str = "DUALDIST_PACKAGE_MANAGER";

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip DUALDIST_* overrides
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Directory every relative path in `project` is resolved against
    pub project_root: PathBuf,

    /// Config file the project was read from, if any
    pub source_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable environment variable overrides
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find dualdist.toml. When none exists the
    /// built-in layout is used, rooted at `start_dir`.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let config = match find_config_file(start_dir) {
            Some(path) => {
                let project = ProjectConfig::load_from_file(&path)?;
                Config {
                    project,
                    project_root: parent_dir(&path),
                    source_file: Some(path),
                }
            }
            None => Config {
                project: ProjectConfig::default(),
                project_root: start_dir.to_path_buf(),
                source_file: None,
            },
        };

        self.finish(config)
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;

        self.finish(Config {
            project,
            project_root: parent_dir(config_path),
            source_file: Some(config_path.to_path_buf()),
        })
    }

    fn finish(&self, mut config: Config) -> ConfigResult<Config> {
        if !self.ignore_env {
            apply_env_overrides(&mut config.project);
        }
        config.project.validate()?;
        Ok(config)
    }
}

/// Find dualdist.toml by walking up from `start_dir`
fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Apply environment variable overrides to the toolchain
fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Some(compiler) = non_empty_var(ENV_COMPILER) {
        config.toolchain.compiler = compiler;
    }
    if let Some(declarations) = non_empty_var(ENV_DECLARATIONS) {
        config.toolchain.declarations = declarations;
    }
    if let Some(package_manager) = non_empty_var(ENV_PACKAGE_MANAGER) {
        config.toolchain.package_manager = package_manager;
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
