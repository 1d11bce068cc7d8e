//! Natural language command resolution
//!
//! Rule-based, deterministic mapping from phrases like
//! "create a new folder called Projects" onto the same canonical commands
//! the literal parser produces:
//! raw phrase -> Phrase -> first matching IntentRule -> Extractor -> Invocation

pub mod phrase;
pub mod resolver;
pub mod rules;

pub use phrase::Phrase;
pub use resolver::{IntentResolver, Resolution};
pub use rules::{Extractor, IntentRule, EXAMPLES, STANDARD_RULES};
