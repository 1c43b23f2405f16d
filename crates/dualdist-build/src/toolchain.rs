//! Command lines for the external tools the build drives

use crate::runner::{CommandKind, ShellCommand};
use dualdist_config::ProjectConfig;
use std::path::Path;

/// Transform that rewrites module syntax for the second module format
pub const IMPORTS_TRANSFORM: &str = "imports";

/// External tools and the extensions they produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler executable (may include leading arguments)
    pub compiler: String,
    /// Type-declaration generator executable
    pub declarations: String,
    pub package_manager: String,
    /// Transforms every compiler pass applies
    pub transforms: Vec<String>,
    /// Extension the compiler writes
    pub compiled_extension: String,
    /// Extension first-pass modules are renamed to
    pub renamed_extension: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

impl Toolchain {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            compiler: config.toolchain.compiler.clone(),
            declarations: config.toolchain.declarations.clone(),
            package_manager: config.toolchain.package_manager.clone(),
            transforms: config.toolchain.transforms.clone(),
            compiled_extension: config.extensions.compiled.clone(),
            renamed_extension: config.extensions.renamed.clone(),
        }
    }

    /// Compile `source` into `output`. With `imports` the import
    /// normalization transform runs ahead of the configured ones.
    pub fn compile(&self, source: &Path, output: &Path, imports: bool, cwd: &Path) -> ShellCommand {
        let mut transforms: Vec<&str> = Vec::with_capacity(self.transforms.len() + 1);
        if imports {
            transforms.push(IMPORTS_TRANSFORM);
        }
        transforms.extend(
            self.transforms
                .iter()
                .map(String::as_str)
                .filter(|t| *t != IMPORTS_TRANSFORM),
        );

        let command = format!(
            "{} {} -d {} --transforms {}",
            self.compiler,
            quote_path(source),
            quote_path(output),
            quote(&transforms.join(","))
        );
        ShellCommand::new(CommandKind::Compile, command, cwd)
    }

    /// Emit declaration files for `project` into `output`
    pub fn emit_declarations(&self, project: &Path, output: &Path, cwd: &Path) -> ShellCommand {
        let command = format!(
            "{} --emitDeclarationOnly --project {} --outDir {}",
            self.declarations,
            quote_path(project),
            quote_path(output)
        );
        ShellCommand::new(CommandKind::Declarations, command, cwd)
    }

    /// Install the dependencies of the package in `cwd`
    pub fn install(&self, cwd: &Path) -> ShellCommand {
        ShellCommand::new(CommandKind::Install, self.package_manager.clone(), cwd)
    }

    /// Register the package in `cwd` as locally linkable
    pub fn link_self(&self, cwd: &Path) -> ShellCommand {
        let command = format!("{} link", self.package_manager);
        ShellCommand::new(CommandKind::LinkSelf, command, cwd)
    }

    /// Point the package in `cwd` at the locally linked `package`
    pub fn link_package(&self, package: &str, cwd: &Path) -> ShellCommand {
        let command = format!("{} link {}", self.package_manager, quote(package));
        ShellCommand::new(CommandKind::LinkPackage, command, cwd)
    }
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Single-quote `arg` for `sh` unless it only holds safe characters
fn quote(arg: &str) -> String {
    let safe = !arg.is_empty() && arg.chars().all(is_shell_safe);
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '_' | '.' | '/' | ',' | '@' | ':' | '+' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn toolchain() -> Toolchain {
        Toolchain::default()
    }

    #[test]
    fn test_compile_without_imports() {
        let cmd = toolchain().compile(
            Path::new("src"),
            Path::new("dist"),
            false,
            Path::new("/repo"),
        );
        assert_eq!(cmd.kind, CommandKind::Compile);
        assert_eq!(
            cmd.command,
            "./node_modules/.bin/sucrase src -d dist --transforms typescript"
        );
        assert_eq!(cmd.cwd, PathBuf::from("/repo"));
    }

    #[test]
    fn test_compile_with_imports_first() {
        let cmd = toolchain().compile(Path::new("src"), Path::new("dist"), true, Path::new("."));
        assert!(cmd.command.ends_with("--transforms imports,typescript"));
    }

    #[test]
    fn test_imports_not_duplicated() {
        let mut toolchain = toolchain();
        toolchain.transforms = vec!["imports".to_string(), "jsx".to_string()];
        let cmd = toolchain.compile(Path::new("src"), Path::new("dist"), true, Path::new("."));
        assert!(cmd.command.ends_with("--transforms imports,jsx"));
    }

    #[test]
    fn test_declarations_command() {
        let cmd = toolchain().emit_declarations(
            Path::new("plugins/a"),
            Path::new("plugins/a/dist"),
            Path::new("."),
        );
        assert_eq!(cmd.kind, CommandKind::Declarations);
        assert_eq!(
            cmd.command,
            "./node_modules/.bin/tsc --emitDeclarationOnly \
             --project plugins/a --outDir plugins/a/dist"
        );
    }

    #[test]
    fn test_package_manager_commands() {
        let tc = toolchain();
        let dir = Path::new("/repo/plugins/a");
        assert_eq!(tc.install(dir).command, "yarn");
        assert_eq!(tc.link_self(dir).command, "yarn link");
        assert_eq!(tc.link_package("@scope/core", dir).command, "yarn link @scope/core");
        assert_eq!(tc.link_package("core", dir).cwd, PathBuf::from("/repo/plugins/a"));
    }

    #[test]
    fn test_quote_unsafe_arguments() {
        assert_eq!(quote("my dir/src"), "'my dir/src'");
        assert_eq!(quote("it's"), r"'it'\''s'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("plain/path-1.0"), "plain/path-1.0");
    }
}
