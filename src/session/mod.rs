//! Session state threaded through each dispatch cycle

pub mod history;
pub mod state;

pub use history::{HistoryEntry, HistoryLog};
pub use state::{Session, SessionId};
