//! Project Configuration (dualdist.toml)
//!
//! Describes the primary package, the integrations built against it, the
//! external tools invoked for each build stage, and the file extensions that
//! separate the two module formats in the primary output tree.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Project configuration from dualdist.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Primary package layout
    #[serde(default)]
    pub package: PackageConfig,

    /// External tools
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Compiled and renamed module extensions
    #[serde(default)]
    pub extensions: ExtensionConfig,

    /// Dependent packages, built in declared order
    #[serde(default)]
    pub integrations: Vec<IntegrationConfig>,
}

/// Primary package configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package name, used when integrations link against it
    pub name: String,

    /// Source directory (default: "src")
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Output directory (default: "dist")
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Project descriptor directory for declaration generation (default: "src")
    #[serde(default = "default_source")]
    pub project: PathBuf,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: "sucrase".to_string(),
            source: default_source(),
            output: default_output(),
            project: default_source(),
        }
    }
}

/// External tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Compiler executable
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Type-declaration generator executable
    #[serde(default = "default_declarations")]
    pub declarations: String,

    /// Package manager used for install and link
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    /// Transforms applied on every compiler pass
    #[serde(default = "default_transforms")]
    pub transforms: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            declarations: default_declarations(),
            package_manager: default_package_manager(),
            transforms: default_transforms(),
        }
    }
}

/// Module extension configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Extension the compiler writes (default: ".js")
    #[serde(default = "default_compiled_extension")]
    pub compiled: String,

    /// Extension given to first-pass output (default: ".mjs")
    #[serde(default = "default_renamed_extension")]
    pub renamed: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            compiled: default_compiled_extension(),
            renamed: default_renamed_extension(),
        }
    }
}

/// One integration package
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntegrationConfig {
    /// Integration directory, relative to the project root
    pub path: PathBuf,

    /// Display name (default: the path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Source directory (default: "<path>/src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Output directory (default: "<path>/dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Project descriptor directory (default: "<path>")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<PathBuf>,
}

impl IntegrationConfig {
    /// Create an integration at the given path with conventional layout
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            source: None,
            output: None,
            project: None,
        }
    }

    /// Name shown in progress output
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn source_dir(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(|| self.path.join("src"))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.path.join("dist"))
    }

    pub fn project_dir(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| self.path.clone())
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package: PackageConfig::default(),
            toolchain: ToolchainConfig::default(),
            extensions: ExtensionConfig::default(),
            integrations: [
                "integrations/gulp-plugin",
                "integrations/jest-plugin",
                "integrations/webpack-loader",
                "integrations/webpack-object-rest-spread-plugin",
            ]
            .into_iter()
            .map(IntegrationConfig::new)
            .collect(),
        }
    }
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::TomlParseError { error, .. } => ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate configuration from TOML source
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: PathBuf::from(crate::CONFIG_FILE_NAME),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.package.name.trim().is_empty() {
            return Err(ConfigError::invalid("package.name", "name cannot be empty"));
        }

        for (field, value) in [
            ("toolchain.compiler", &self.toolchain.compiler),
            ("toolchain.declarations", &self.toolchain.declarations),
            ("toolchain.package_manager", &self.toolchain.package_manager),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "command cannot be empty"));
            }
        }

        if self.toolchain.transforms.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "toolchain.transforms",
                "transform names cannot be empty",
            ));
        }

        self.extensions.validate()?;

        let mut seen = HashSet::new();
        for integration in &self.integrations {
            if integration.path.as_os_str().is_empty() {
                return Err(ConfigError::invalid(
                    "integrations.path",
                    "path cannot be empty",
                ));
            }
            if !seen.insert(&integration.path) {
                return Err(ConfigError::invalid(
                    "integrations.path",
                    format!("duplicate integration '{}'", integration.path.display()),
                ));
            }
        }

        Ok(())
    }
}

impl ExtensionConfig {
    /// Check that the two extensions cannot be confused with each other.
    ///
    /// A renamed file must never match the compiled extension again, otherwise
    /// renaming an already renamed tree would not be a no-op.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("extensions.compiled", &self.compiled),
            ("extensions.renamed", &self.renamed),
        ] {
            if value.len() < 2 || !value.starts_with('.') {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' must start with '.' followed by a suffix", value),
                ));
            }
        }

        if self.renamed == self.compiled || self.renamed.ends_with(&self.compiled) {
            return Err(ConfigError::ExtensionCollision {
                compiled: self.compiled.clone(),
                renamed: self.renamed.clone(),
            });
        }

        Ok(())
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("src")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

fn default_compiler() -> String {
    "./node_modules/.bin/sucrase".to_string()
}

fn default_declarations() -> String {
    "./node_modules/.bin/tsc".to_string()
}

fn default_package_manager() -> String {
    "yarn".to_string()
}

fn default_transforms() -> Vec<String> {
    vec!["typescript".to_string()]
}

fn default_compiled_extension() -> String {
    ".js".to_string()
}

fn default_renamed_extension() -> String {
    ".mjs".to_string()
}
