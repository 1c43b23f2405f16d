/// Build system error types
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "Command `{command}` failed with {}{}",
        describe_exit(.exit_code),
        describe_output(.output)
    )]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Failed to spawn `{command}`: {error}")]
    CommandSpawn {
        command: String,
        error: std::io::Error,
    },

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Renamed extension '{renamed}' collides with compiled extension '{compiled}'")]
    ExtensionCollision { compiled: String, renamed: String },

    #[error("Failed to start build workers: {0}")]
    ThreadPool(String),
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a command failure from an exit status
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            output: output.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(command: impl Into<String>, error: std::io::Error) -> Self {
        Self::CommandSpawn {
            command: command.into(),
            error,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Captured tool output, indented under the failure line
fn describe_output(output: &str) -> String {
    let output = output.trim_end();
    if output.is_empty() {
        return String::new();
    }
    let mut described = String::from(":");
    for line in output.lines() {
        described.push_str("\n    ");
        described.push_str(line);
    }
    described
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = BuildError::command_failed("yarn link", Some(2), "");
        assert_eq!(err.to_string(), "Command `yarn link` failed with exit code 2");
    }

    #[test]
    fn test_command_failed_message_includes_output() {
        let err = BuildError::command_failed(
            "sucrase src -d dist",
            Some(1),
            "src/index.ts: Unexpected token\n  at line 3\n",
        );
        assert_eq!(
            err.to_string(),
            "Command `sucrase src -d dist` failed with exit code 1:\n    \
             src/index.ts: Unexpected token\n      at line 3"
        );
    }

    #[test]
    fn test_command_killed_message() {
        let err = BuildError::command_failed("tsc", None, "");
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = BuildError::io(
            "dist/index.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("dist/index.js"));
    }
}
