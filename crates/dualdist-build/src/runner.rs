//! External command execution
//!
//! Every command carries its own working directory. Nothing in the build
//! changes the process-wide current directory, so commands for different
//! targets can run at the same time.

use crate::error::{BuildError, BuildResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// What an external command does for the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// Compiler pass
    Compile,
    /// Type-declaration generation
    Declarations,
    /// Package manager dependency install
    Install,
    /// Publish the current package as locally linkable
    LinkSelf,
    /// Consume a locally linked package
    LinkPackage,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Declarations => "declarations",
            Self::Install => "install",
            Self::LinkSelf => "link",
            Self::LinkPackage => "link-package",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A shell command bound to the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellCommand {
    pub kind: CommandKind,
    /// Command line handed to `sh -c`
    pub command: String,
    /// Working directory for the command
    pub cwd: PathBuf,
}

impl ShellCommand {
    pub fn new(kind: CommandKind, command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            command: command.into(),
            cwd: cwd.into(),
        }
    }
}

impl std::fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (in {})", self.command, self.cwd.display())
    }
}

/// Runs a command to completion.
///
/// `Ok(())` means the command exited zero. A non-zero exit or a spawn
/// failure is an error.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &ShellCommand) -> BuildResult<()>;
}

/// How command output reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Inherit stdout/stderr so tool output streams through
    #[default]
    Inherit,
    /// Buffer output and attach it to the error on failure
    Capture,
}

/// Runs commands through `sh -c`
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    output: OutputMode,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output handling
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    fn shell(command: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).current_dir(cwd);
        cmd
    }

    fn run_inherited(&self, command: &ShellCommand) -> BuildResult<()> {
        let status = Self::shell(&command.command, &command.cwd)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| BuildError::spawn(&command.command, e))?;

        if !status.success() {
            return Err(BuildError::command_failed(
                &command.command,
                status.code(),
                String::new(),
            ));
        }
        Ok(())
    }

    fn run_captured(&self, command: &ShellCommand) -> BuildResult<()> {
        let output = Self::shell(&command.command, &command.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| BuildError::spawn(&command.command, e))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(BuildError::command_failed(
                &command.command,
                output.status.code(),
                combined,
            ));
        }
        Ok(())
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &ShellCommand) -> BuildResult<()> {
        tracing::debug!(
            kind = %command.kind,
            cwd = %command.cwd.display(),
            "$ {}",
            command.command
        );
        let start = Instant::now();

        let result = match self.output {
            OutputMode::Inherit => self.run_inherited(command),
            OutputMode::Capture => self.run_captured(command),
        };

        tracing::debug!(
            "{} finished in {:.2}s ({})",
            command.kind,
            start.elapsed().as_secs_f64(),
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_kind_names() {
        assert_eq!(CommandKind::Compile.name(), "compile");
        assert_eq!(CommandKind::LinkSelf.to_string(), "link");
        assert_eq!(CommandKind::LinkPackage.name(), "link-package");
    }

    #[test]
    fn test_shell_command_display() {
        let cmd = ShellCommand::new(CommandKind::Install, "yarn", "plugins/a");
        assert_eq!(cmd.to_string(), "yarn (in plugins/a)");
    }

    #[test]
    fn test_default_output_mode_inherits() {
        assert_eq!(OutputMode::default(), OutputMode::Inherit);
    }
}
