//! Canonical encoding of an (answer, reasoning) pair

use crate::splitter::{feed, flush, Delimiters, ParserState};

/// Encode as `answer` followed by `open + segment + close` for each segment.
///
/// Round-trips through [`decode`] as long as neither the answer nor any
/// segment contains a marker.
pub fn encode(answer: &str, reasoning: &[String], delimiters: &Delimiters) -> String {
    let wrapped: usize = reasoning
        .iter()
        .map(|segment| segment.len() + delimiters.open().len() + delimiters.close().len())
        .sum();
    let mut out = String::with_capacity(answer.len() + wrapped);
    out.push_str(answer);
    for segment in reasoning {
        out.push_str(delimiters.open());
        out.push_str(segment);
        out.push_str(delimiters.close());
    }
    out
}

/// Split persisted content back into answer text and every reasoning block, in order.
///
/// Runs the same splitter used for live streams, so stored and streamed
/// content are always classified the same way.
pub fn decode(content: &str, delimiters: &Delimiters) -> (String, Vec<String>) {
    let step = feed(ParserState::default(), delimiters, content);
    flush(step.state, delimiters).state.into_parts()
}
