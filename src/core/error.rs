use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("syntax error: {message} (at offset {offset})")]
    Syntax { message: String, offset: usize },

    #[error("{command}: {message}")]
    Argument { command: String, message: String },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("command not understood: '{0}'")]
    NotUnderstood(String),

    #[error("{}: {kind}", path.display())]
    Execution { kind: ExecErrorKind, path: PathBuf },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TerminalError {
    pub fn argument(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Argument {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Wrap a host-level IO failure for `path`, keeping only its kind
    pub fn execution(err: &std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Execution {
            kind: ExecErrorKind::from(err),
            path: path.into(),
        }
    }
}

/// Capability-level failure kinds, worded the way a native shell reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecErrorKind {
    NotFound,
    NotADirectory,
    IsADirectory,
    AlreadyExists,
    NotEmpty,
    PermissionDenied,
    InvalidData,
    /// Source and destination are the same file
    SameFile,
    Other,
}

impl std::fmt::Display for ExecErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ExecErrorKind::NotFound => "No such file or directory",
            ExecErrorKind::NotADirectory => "Not a directory",
            ExecErrorKind::IsADirectory => "Is a directory",
            ExecErrorKind::AlreadyExists => "File exists",
            ExecErrorKind::NotEmpty => "Directory not empty",
            ExecErrorKind::PermissionDenied => "Permission denied",
            ExecErrorKind::InvalidData => "Binary file",
            ExecErrorKind::SameFile => "Same file",
            ExecErrorKind::Other => "Input/output error",
        };
        f.write_str(text)
    }
}

impl From<&std::io::Error> for ExecErrorKind {
    fn from(err: &std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => ExecErrorKind::NotFound,
            ErrorKind::PermissionDenied => ExecErrorKind::PermissionDenied,
            ErrorKind::AlreadyExists => ExecErrorKind::AlreadyExists,
            ErrorKind::NotADirectory => ExecErrorKind::NotADirectory,
            ErrorKind::IsADirectory => ExecErrorKind::IsADirectory,
            ErrorKind::DirectoryNotEmpty => ExecErrorKind::NotEmpty,
            ErrorKind::InvalidData => ExecErrorKind::InvalidData,
            _ => ExecErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TerminalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message() {
        let err = TerminalError::Execution {
            kind: ExecErrorKind::NotFound,
            path: PathBuf::from("missing.txt"),
        };
        assert_eq!(err.to_string(), "missing.txt: No such file or directory");
    }

    #[test]
    fn test_io_kind_mapping() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(ExecErrorKind::from(&err), ExecErrorKind::PermissionDenied);

        let err = std::io::Error::new(std::io::ErrorKind::Interrupted, "again");
        assert_eq!(ExecErrorKind::from(&err), ExecErrorKind::Other);
    }

    #[test]
    fn test_command_not_found_message() {
        let err = TerminalError::CommandNotFound("frobnicate".into());
        assert_eq!(err.to_string(), "frobnicate: command not found");
    }
}
