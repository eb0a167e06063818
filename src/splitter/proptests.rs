//! Property-based tests for the splitter
//!
//! - Any partition of the input yields the same answer and reasoning
//! - Emitted text equals the input with matched markers removed
//! - The held-back tail stays shorter than the longest marker
//! - Boundary events alternate, starting with an open

use super::*;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn split_all(delimiters: &Delimiters, fragments: &[String]) -> (ParserState, Vec<SplitEvent>) {
    let mut state = ParserState::default();
    let mut events = Vec::new();
    for fragment in fragments {
        let step = feed(state, delimiters, fragment);
        state = step.state;
        events.extend(step.events);
    }
    let step = flush(state, delimiters);
    events.extend(step.events);
    (step.state, events)
}

/// Cut `text` at the given char positions (sorted, deduplicated)
fn partition(text: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (chars.len() + 1)).collect();
    points.push(0);
    points.push(chars.len());
    points.sort_unstable();
    points.dedup();
    points
        .windows(2)
        .map(|w| chars[w[0]..w[1]].iter().collect())
        .collect()
}

// ============================================================================
// Strategies
// ============================================================================

/// Text built from pieces that frequently form (or almost form) markers
fn arb_stream_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-z <>/é思]{0,6}",
            2 => Just("<think>".to_string()),
            2 => Just("</think>".to_string()),
            1 => Just("<thi".to_string()),
            1 => Just("</thin".to_string()),
            1 => Just("<".to_string()),
        ],
        0..20,
    )
    .prop_map(|pieces| pieces.concat())
}

fn arb_cuts() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..200, 0..30)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_fragmentation_invariance(text in arb_stream_text(), cuts in arb_cuts()) {
        let delimiters = Delimiters::think();
        let (whole, _) = split_all(&delimiters, &[text.clone()]);
        let (pieces, _) = split_all(&delimiters, &partition(&text, &cuts));

        prop_assert_eq!(whole.answer(), pieces.answer());
        prop_assert_eq!(whole.reasoning(), pieces.reasoning());
    }

    #[test]
    fn prop_single_char_fragments_match_whole(text in arb_stream_text()) {
        let delimiters = Delimiters::think();
        let singles: Vec<String> = text.chars().map(String::from).collect();
        let (whole, whole_events) = split_all(&delimiters, &[text.clone()]);
        let (pieces, piece_events) = split_all(&delimiters, &singles);

        prop_assert_eq!(whole.answer(), pieces.answer());
        prop_assert_eq!(whole.reasoning(), pieces.reasoning());

        let boundaries = |events: &[SplitEvent]| {
            events.iter().filter(|e| e.is_boundary()).cloned().collect::<Vec<_>>()
        };
        prop_assert_eq!(boundaries(&whole_events), boundaries(&piece_events));
    }

    #[test]
    fn prop_text_is_conserved(text in arb_stream_text(), cuts in arb_cuts()) {
        let delimiters = Delimiters::think();
        let (state, events) = split_all(&delimiters, &partition(&text, &cuts));

        // Re-insert markers at boundary events and compare with the input
        let mut rebuilt = String::new();
        for event in &events {
            match event {
                SplitEvent::AnswerText(t) | SplitEvent::ReasoningChunk(t) => rebuilt.push_str(t),
                SplitEvent::ReasoningOpen => rebuilt.push_str(delimiters.open()),
                SplitEvent::ReasoningClose => rebuilt.push_str(delimiters.close()),
            }
        }
        prop_assert_eq!(&rebuilt, &text);

        let emitted: usize = events.iter().filter_map(SplitEvent::text).map(str::len).sum();
        let buffered = state.answer().len() + state.reasoning().iter().map(String::len).sum::<usize>();
        prop_assert_eq!(emitted, buffered);
    }

    #[test]
    fn prop_pending_is_bounded(text in arb_stream_text(), cuts in arb_cuts()) {
        let delimiters = Delimiters::think();
        let mut state = ParserState::default();
        for fragment in partition(&text, &cuts) {
            state = feed(state, &delimiters, &fragment).state;
            prop_assert!(
                state.pending().len() < delimiters.max_len(),
                "pending {:?} not shorter than longest marker",
                state.pending()
            );
        }
    }

    #[test]
    fn prop_boundaries_alternate(text in arb_stream_text()) {
        let delimiters = Delimiters::think();
        let (state, events) = split_all(&delimiters, &[text]);
        let mut expect_open = true;
        let mut opens = 0usize;
        for event in events.iter().filter(|e| e.is_boundary()) {
            if expect_open {
                prop_assert_eq!(event, &SplitEvent::ReasoningOpen);
                opens += 1;
            } else {
                prop_assert_eq!(event, &SplitEvent::ReasoningClose);
            }
            expect_open = !expect_open;
        }
        prop_assert_eq!(opens, state.reasoning().len());
    }
}
