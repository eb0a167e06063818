//! Ordered `{role, content}` history for one conversation

use super::{FinalizedMessage, HistoryError, HistoryResult, Role};
use crate::splitter::Delimiters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A conversation's history.
///
/// Turns alternate: a user message must be answered (or its stream cancelled
/// and finalized) before the next user message is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    entries: Vec<HistoryEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while the latest user message has no assistant reply
    pub fn awaiting_reply(&self) -> bool {
        self.entries
            .last()
            .is_some_and(|entry| entry.role == Role::User)
    }

    /// Append a user message.
    ///
    /// The text is trimmed. Messages without a single alphanumeric character
    /// are rejected and nothing is appended.
    pub fn push_user(&mut self, text: &str) -> HistoryResult<&HistoryEntry> {
        let text = text.trim();
        if !text.chars().any(char::is_alphanumeric) {
            return Err(HistoryError::NoAlphanumeric);
        }
        if self.awaiting_reply() {
            return Err(HistoryError::TurnInProgress);
        }
        Ok(self.push(Role::User, text.to_string()))
    }

    /// Append the finalized reply to the pending user message
    pub fn push_assistant(
        &mut self,
        message: &FinalizedMessage,
        delimiters: &Delimiters,
    ) -> HistoryResult<&HistoryEntry> {
        if !self.awaiting_reply() {
            return Err(HistoryError::NoTurnInProgress);
        }
        Ok(self.push(Role::Assistant, message.encode(delimiters)))
    }

    /// Decode every entry for re-display
    pub fn turns(&self, delimiters: &Delimiters) -> Vec<FinalizedMessage> {
        self.entries
            .iter()
            .map(|entry| match entry.role {
                Role::User => FinalizedMessage::user(entry.content.clone()),
                Role::Assistant => FinalizedMessage::from_encoded(&entry.content, delimiters),
            })
            .collect()
    }

    fn push(&mut self, role: Role, content: String) -> &HistoryEntry {
        self.entries.push(HistoryEntry {
            role,
            content,
            created_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
