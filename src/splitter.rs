//! Tagged stream splitter
//!
//! Classifies an arbitrarily fragmented text stream into answer text and
//! reasoning text. Same shape as a pure state machine: `feed` and `flush`
//! take the current state and return the next state plus the events the
//! step produced.

mod delimiter;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use delimiter::{DelimiterError, Delimiters, DEFAULT_CLOSE, DEFAULT_OPEN};
pub use event::SplitEvent;
pub use state::{Mode, ParserState};
pub use transition::{feed, flush, Split};

/// Owns one response's parser state together with its delimiters.
///
/// Convenience for callers that hold the splitter in a single place rather
/// than threading `ParserState` through `feed` by value.
#[derive(Debug, Clone)]
pub struct TagSplitter {
    delimiters: Delimiters,
    state: ParserState,
}

impl TagSplitter {
    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            state: ParserState::default(),
        }
    }

    /// Feed one fragment, returning the events it produced
    pub fn push(&mut self, fragment: &str) -> Vec<SplitEvent> {
        let state = std::mem::take(&mut self.state);
        let Split { state, events } = feed(state, &self.delimiters, fragment);
        self.state = state;
        events
    }

    /// End the stream: flush whatever is held back and hand over the final state
    pub fn finish(self) -> (ParserState, Vec<SplitEvent>) {
        let Split { state, events } = flush(self.state, &self.delimiters);
        (state, events)
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }
}

impl Default for TagSplitter {
    fn default() -> Self {
        Self::new(Delimiters::think())
    }
}
