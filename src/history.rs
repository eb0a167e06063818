//! Conversation history
//!
//! Persists finalized turns as `{role, content}` entries. Assistant content
//! uses one canonical encoding: the answer text followed by each reasoning
//! segment wrapped in the open/close markers, in order.

mod codec;
mod conversation;
mod message;
mod store;

#[cfg(test)]
mod proptests;

pub use codec::{decode, encode};
pub use conversation::{Conversation, HistoryEntry};
pub use message::{FinalizedMessage, Role};
pub use store::HistoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Message has no alphanumeric content")]
    NoAlphanumeric,
    #[error("A reply is still pending for the previous message")]
    TurnInProgress,
    #[error("No user message is awaiting a reply")]
    NoTurnInProgress,
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
