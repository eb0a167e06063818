//! Parser state for one in-flight response

use serde::{Deserialize, Serialize};

/// Which channel incoming text currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Answer,
    Reasoning,
}

/// State of one response stream.
///
/// Created when a response starts, advanced once per fragment, and consumed
/// when the stream ends. Never shared between responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub(crate) mode: Mode,
    /// Held-back tail that may still complete the expected marker
    pub(crate) pending: String,
    pub(crate) answer: String,
    pub(crate) reasoning: Vec<String>,
}

impl ParserState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Answer text classified so far
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Reasoning segments so far; the last one may still be open
    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.answer, self.reasoning)
    }
}
