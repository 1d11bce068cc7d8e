//! Core type definitions shared by the resolution pipeline and the handlers

use crate::core::error::{ExecErrorKind, TerminalError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value recorded for a parsed flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean flag that was given
    Present,
    /// Value-taking flag with its argument
    Value(String),
}

/// A fully resolved command, ready for its handler
///
/// Built once per input (by the flag parser or the intent resolver) and
/// handed to the handler by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Canonical command name
    pub command: String,
    /// Flags keyed by their declared name
    pub flags: BTreeMap<String, FlagValue>,
    /// Positional arguments in input order
    pub positional: Vec<String>,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            flags: BTreeMap::new(),
            positional: Vec::new(),
        }
    }

    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.flags.insert(name.into(), FlagValue::Present);
        self
    }

    pub fn with_positional(mut self, arg: impl Into<String>) -> Self {
        self.positional.push(arg.into());
        self
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn flag_value(&self, name: &str) -> Option<&str> {
        match self.flags.get(name) {
            Some(FlagValue::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Side effect a result asks the front-end to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Clear,
    Exit,
}

/// Classification of a failed result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ErrorKind {
    Syntax,
    Argument,
    CommandNotFound,
    NotUnderstood,
    Execution(ExecErrorKind),
    Internal,
}

impl ErrorKind {
    /// Shell-style exit status for this failure class
    pub fn exit_status(self) -> i32 {
        match self {
            ErrorKind::Syntax | ErrorKind::Argument => 2,
            ErrorKind::CommandNotFound | ErrorKind::NotUnderstood => 127,
            ErrorKind::Execution(_) | ErrorKind::Internal => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TerminalError> for CommandError {
    fn from(err: &TerminalError) -> Self {
        let kind = match err {
            TerminalError::Syntax { .. } => ErrorKind::Syntax,
            TerminalError::Argument { .. } => ErrorKind::Argument,
            TerminalError::CommandNotFound(_) => ErrorKind::CommandNotFound,
            TerminalError::NotUnderstood(_) => ErrorKind::NotUnderstood,
            TerminalError::Execution { kind, .. } => ErrorKind::Execution(*kind),
            TerminalError::Config(_) | TerminalError::Io(_) | TerminalError::Serde(_) => {
                ErrorKind::Internal
            }
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Outcome of running one handler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub success: bool,
    /// Output text, possibly multi-line; may be partial on failure
    pub output: String,
    pub error: Option<CommandError>,
    pub control: Option<Control>,
}

impl ExecutionResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            control: None,
        }
    }

    pub fn empty() -> Self {
        Self::ok(String::new())
    }

    pub fn control(control: Control) -> Self {
        Self {
            control: Some(control),
            ..Self::empty()
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(CommandError {
                kind,
                message: message.into(),
            }),
            control: None,
        }
    }

    pub fn from_error(err: &TerminalError) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(CommandError::from(err)),
            control: None,
        }
    }

    /// Attach output produced before the failure (e.g. `cat a missing b`)
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn exit_status(&self) -> i32 {
        match &self.error {
            None if self.success => 0,
            None => 1,
            Some(err) => err.kind.exit_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builders() {
        let inv = Invocation::new("ls").with_flag("a").with_positional("/tmp");
        assert!(inv.has_flag("a"));
        assert!(!inv.has_flag("l"));
        assert_eq!(inv.positional, vec!["/tmp".to_string()]);
        assert_eq!(inv.flag_value("a"), None);
    }

    #[test]
    fn test_exit_status_by_kind() {
        assert_eq!(ExecutionResult::empty().exit_status(), 0);
        assert_eq!(
            ExecutionResult::failed(ErrorKind::CommandNotFound, "x").exit_status(),
            127
        );
        assert_eq!(
            ExecutionResult::failed(ErrorKind::Argument, "x").exit_status(),
            2
        );
        assert_eq!(
            ExecutionResult::failed(ErrorKind::Execution(ExecErrorKind::NotEmpty), "x")
                .exit_status(),
            1
        );
    }

    #[test]
    fn test_error_kind_serialization() {
        let json =
            serde_json::to_string(&ErrorKind::Execution(ExecErrorKind::NotFound)).unwrap();
        assert_eq!(json, r#"{"kind":"execution","detail":"not_found"}"#);
    }
}
