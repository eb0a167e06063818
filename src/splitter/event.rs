//! Events produced while splitting a stream

use serde::{Deserialize, Serialize};

/// A classified piece of the stream, in delivery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum SplitEvent {
    /// Text outside any reasoning block
    AnswerText(String),
    /// An open marker was matched; a new reasoning segment starts
    ReasoningOpen,
    /// Text inside the current reasoning block
    ReasoningChunk(String),
    /// A close marker was matched
    ReasoningClose,
}

impl SplitEvent {
    /// Text payload, if this event carries any
    pub fn text(&self) -> Option<&str> {
        match self {
            SplitEvent::AnswerText(text) | SplitEvent::ReasoningChunk(text) => Some(text),
            SplitEvent::ReasoningOpen | SplitEvent::ReasoningClose => None,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, SplitEvent::ReasoningOpen | SplitEvent::ReasoningClose)
    }
}
