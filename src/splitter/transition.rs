//! Pure step functions for the splitter
//!
//! `feed` and `flush` do no I/O and never fail. Given the same state and
//! input they always produce the same state and events.

use super::delimiter::{partial_suffix_len, Delimiters};
use super::event::SplitEvent;
use super::state::{Mode, ParserState};

/// Result of one splitter step
#[derive(Debug)]
pub struct Split {
    pub state: ParserState,
    pub events: Vec<SplitEvent>,
}

/// Consume one fragment.
///
/// Scans the held-back tail plus the new fragment for the marker the current
/// mode expects. Each match emits the preceding text, the boundary event, and
/// flips the mode, and scanning continues over the rest of the same buffer.
/// When no match remains, everything except the longest tail that could still
/// start a marker is emitted immediately.
pub fn feed(mut state: ParserState, delimiters: &Delimiters, fragment: &str) -> Split {
    let mut events = Vec::new();
    state.pending.push_str(fragment);

    loop {
        let marker = delimiters.expected(state.mode);
        if let Some(idx) = state.pending.find(marker) {
            let text: String = state.pending.drain(..idx).collect();
            state.pending.drain(..marker.len());
            state.emit_text(text, &mut events);
            state.toggle(&mut events);
        } else {
            let hold = partial_suffix_len(&state.pending, marker);
            let ready = state.pending.len() - hold;
            let text: String = state.pending.drain(..ready).collect();
            state.emit_text(text, &mut events);
            break;
        }
    }

    Split { state, events }
}

/// End of stream.
///
/// Whatever is still held back never completed a marker, so it is literal
/// text of the current mode. An unterminated reasoning block stays as the
/// last segment; no close event is synthesized.
pub fn flush(mut state: ParserState, _delimiters: &Delimiters) -> Split {
    let mut events = Vec::new();
    let rest = std::mem::take(&mut state.pending);
    state.emit_text(rest, &mut events);
    Split { state, events }
}

impl ParserState {
    fn emit_text(&mut self, text: String, events: &mut Vec<SplitEvent>) {
        if text.is_empty() {
            return;
        }
        match self.mode {
            Mode::Answer => {
                self.answer.push_str(&text);
                events.push(SplitEvent::AnswerText(text));
            }
            Mode::Reasoning => {
                match self.reasoning.last_mut() {
                    Some(segment) => segment.push_str(&text),
                    None => self.reasoning.push(text.clone()),
                }
                events.push(SplitEvent::ReasoningChunk(text));
            }
        }
    }

    fn toggle(&mut self, events: &mut Vec<SplitEvent>) {
        match self.mode {
            Mode::Answer => {
                self.mode = Mode::Reasoning;
                self.reasoning.push(String::new());
                events.push(SplitEvent::ReasoningOpen);
            }
            Mode::Reasoning => {
                self.mode = Mode::Answer;
                events.push(SplitEvent::ReasoningClose);
            }
        }
    }
}
