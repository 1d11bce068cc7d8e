//! Command pipeline
//!
//! Literal input: raw line -> tokenizer -> flag parser -> Invocation.
//! Phrases go through `crate::nlp` instead and meet the same Invocation.
//! Either way: Invocation -> registry lookup -> Handler -> ExecutionResult.

pub mod dispatcher;
pub mod flags;
pub mod handlers;
pub mod registry;
pub mod tokenizer;

pub use dispatcher::{Dispatcher, Response, NLP_PREFIX};
pub use handlers::{ExecContext, Handler};
pub use registry::{CommandRegistry, CommandSpec, FlagSpec};
pub use tokenizer::tokenize;
