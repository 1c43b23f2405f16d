/// Build targets: the primary package and the integrations built against it
use dualdist_config::{Config, IntegrationConfig, PackageConfig};
use std::path::PathBuf;

/// The package every integration depends on.
///
/// Paths are relative to the workspace root unless configured as absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryTarget {
    /// Package name, used for linking
    pub name: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Project descriptor used for declaration generation
    pub project_dir: PathBuf,
}

impl PrimaryTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("dist"),
            project_dir: PathBuf::from("src"),
        }
    }
}

impl From<&PackageConfig> for PrimaryTarget {
    fn from(config: &PackageConfig) -> Self {
        Self {
            name: config.name.clone(),
            source_dir: config.source.clone(),
            output_dir: config.output.clone(),
            project_dir: config.project.clone(),
        }
    }
}

/// A dependent package that installs its own dependencies and links against
/// the primary package before compiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationTarget {
    /// Display name
    pub name: String,
    /// Package directory; install and link commands run here
    pub path: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub project_dir: PathBuf,
}

impl IntegrationTarget {
    /// Integration with the conventional `src`/`dist` layout under `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            source_dir: path.join("src"),
            output_dir: path.join("dist"),
            project_dir: path.clone(),
            path,
        }
    }
}

impl From<&IntegrationConfig> for IntegrationTarget {
    fn from(config: &IntegrationConfig) -> Self {
        Self {
            name: config.display_name(),
            path: config.path.clone(),
            source_dir: config.source_dir(),
            output_dir: config.output_dir(),
            project_dir: config.project_dir(),
        }
    }
}

/// One buildable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    Primary(PrimaryTarget),
    Integration(IntegrationTarget),
}

/// The ordered set of targets plus the directory their paths resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub primary: PrimaryTarget,
    pub integrations: Vec<IntegrationTarget>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, primary: PrimaryTarget) -> Self {
        Self {
            root: root.into(),
            primary,
            integrations: Vec::new(),
        }
    }

    /// Append an integration; build order follows insertion order
    pub fn with_integration(mut self, integration: IntegrationTarget) -> Self {
        self.integrations.push(integration);
        self
    }

    /// Build the target list described by a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.project_root.clone(),
            primary: PrimaryTarget::from(&config.project.package),
            integrations: config
                .project
                .integrations
                .iter()
                .map(IntegrationTarget::from)
                .collect(),
        }
    }

    /// All targets, primary first, integrations in declared order
    pub fn targets(&self) -> Vec<BuildTarget> {
        std::iter::once(BuildTarget::Primary(self.primary.clone()))
            .chain(self.integrations.iter().cloned().map(BuildTarget::Integration))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualdist_config::ProjectConfig;

    #[test]
    fn test_integration_target_layout() {
        let target = IntegrationTarget::new("integrations/webpack-loader");
        assert_eq!(target.name, "integrations/webpack-loader");
        assert_eq!(
            target.source_dir,
            PathBuf::from("integrations/webpack-loader/src")
        );
        assert_eq!(
            target.output_dir,
            PathBuf::from("integrations/webpack-loader/dist")
        );
        assert_eq!(target.project_dir, PathBuf::from("integrations/webpack-loader"));
    }

    #[test]
    fn test_workspace_from_default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            project_root: PathBuf::from("/repo"),
            source_file: None,
        };
        let workspace = Workspace::from_config(&config);
        assert_eq!(workspace.root, PathBuf::from("/repo"));

        let targets = workspace.targets();
        assert_eq!(targets.len(), 5);
        match &targets[0] {
            BuildTarget::Primary(primary) => {
                assert_eq!(primary.name, "sucrase");
                assert_eq!(primary.output_dir, PathBuf::from("dist"));
            }
            other => panic!("primary must come first, got {:?}", other),
        }

        let integrations: Vec<String> = targets[1..]
            .iter()
            .map(|target| match target {
                BuildTarget::Integration(integration) => integration.name.clone(),
                other => panic!("unexpected target {:?}", other),
            })
            .collect();
        assert_eq!(
            integrations,
            vec![
                "integrations/gulp-plugin",
                "integrations/jest-plugin",
                "integrations/webpack-loader",
                "integrations/webpack-object-rest-spread-plugin",
            ]
        );
    }

    #[test]
    fn test_named_integration_keeps_path() {
        let mut config = dualdist_config::IntegrationConfig::new("plugins/alpha");
        config.name = Some("alpha".to_string());

        let target = IntegrationTarget::from(&config);
        assert_eq!(target.name, "alpha");
        assert_eq!(target.path, PathBuf::from("plugins/alpha"));
        assert_eq!(target.output_dir, PathBuf::from("plugins/alpha/dist"));
    }
}
