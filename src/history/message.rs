//! Finalized messages

use crate::finalize::normalize;
use crate::splitter::{Delimiters, ParserState};
use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A completed turn. Immutable once built; owned by the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedMessage {
    pub role: Role,
    pub answer_text: String,
    pub reasoning_segments: Vec<String>,
}

impl FinalizedMessage {
    /// Build the assistant message from a flushed parser state
    pub fn from_state(state: ParserState) -> Self {
        let (answer, reasoning) = state.into_parts();
        Self {
            role: Role::Assistant,
            answer_text: normalize(&answer),
            reasoning_segments: reasoning,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            answer_text: text.into(),
            reasoning_segments: Vec::new(),
        }
    }

    /// Rebuild an assistant message from persisted content
    pub fn from_encoded(content: &str, delimiters: &Delimiters) -> Self {
        let (answer_text, reasoning_segments) = super::decode(content, delimiters);
        Self {
            role: Role::Assistant,
            answer_text,
            reasoning_segments,
        }
    }

    /// Canonical persisted form
    pub fn encode(&self, delimiters: &Delimiters) -> String {
        super::encode(&self.answer_text, &self.reasoning_segments, delimiters)
    }

    pub fn has_reasoning(&self) -> bool {
        !self.reasoning_segments.is_empty()
    }
}
