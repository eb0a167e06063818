//! API request and response types

use crate::history::{FinalizedMessage, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Request to append a user message
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Response for a newly created conversation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response with a conversation's history
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub id: String,
    /// Persisted `{role, content}` entries
    pub messages: Vec<HistoryEntry>,
    /// The same entries decoded for display
    pub turns: Vec<FinalizedMessage>,
    pub awaiting_reply: bool,
    /// A reply stream is currently open
    pub replying: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
