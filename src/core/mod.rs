pub mod config;
pub mod error;
pub mod types;

pub use config::{NlpMode, TerminalConfig};
pub use error::{ExecErrorKind, Result, TerminalError};
pub use types::{Control, ErrorKind, ExecutionResult, FlagValue, Invocation};
