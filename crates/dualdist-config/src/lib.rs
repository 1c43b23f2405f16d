//! dualdist configuration system
//!
//! Provides configuration management for dualdist workspaces:
//! - Project layout (`dualdist.toml`): the primary package and its integrations
//! - Toolchain commands (compiler, declaration generator, package manager)
//! - Output extensions used to tell the two module formats apart
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in default layout
//! 2. Project config (./dualdist.toml, found by walking up from the start directory)
//! 3. Environment variables (DUALDIST_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use dualdist_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("building {}", config.project.package.name);
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "dualdist.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Renamed extension '{renamed}' collides with compiled extension '{compiled}'")]
    ExtensionCollision { compiled: String, renamed: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use project::{
    ExtensionConfig, IntegrationConfig, PackageConfig, ProjectConfig, ToolchainConfig,
};
