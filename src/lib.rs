//! nlterm - Simulated command terminal with natural language commands

pub mod command;
pub mod core;
pub mod host;
pub mod nlp;
pub mod session;
