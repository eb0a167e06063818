//! Driving one response stream to a finalized message
//!
//! One `ParserState` per response. Fragments are processed strictly in
//! order. Every way a stream can end (completion, cancellation, a transport
//! error, the renderer going away) flushes the state and finalizes what was
//! received, so partial answers and reasoning are never discarded.

use crate::history::FinalizedMessage;
use crate::render::{LiveRenderer, RenderError};
use crate::splitter::{feed, flush, Delimiters, ParserState, Split, SplitEvent};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a response stream ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Termination {
    /// The transport delivered the whole stream
    Completed,
    /// The turn was cancelled or its consumer went away
    Cancelled,
    /// The transport failed mid-stream
    Disconnected { reason: String },
}

/// Result of driving one response
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub message: FinalizedMessage,
    pub termination: Termination,
    pub fragments: usize,
}

enum Step {
    Continue,
    Stop(Termination),
}

/// Drive a fragment stream through the splitter into `renderer`.
///
/// Never fails: transport and renderer problems end the turn early, and the
/// partial content is finalized the same way a completed stream is.
pub async fn drive_turn<S, E, R>(
    fragments: S,
    delimiters: &Delimiters,
    renderer: &mut R,
    cancel: &CancellationToken,
) -> TurnOutcome
where
    S: Stream<Item = Result<String, E>>,
    E: Display,
    R: LiveRenderer + ?Sized,
{
    let started = Instant::now();
    let mut fragments = std::pin::pin!(fragments);
    let mut state = ParserState::default();
    let mut count = 0usize;
    let mut renderer_gone = false;

    let termination = loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break Termination::Cancelled,
            next = fragments.next() => next,
        };

        match next {
            Some(Ok(fragment)) => {
                count += 1;
                let Split { state: next_state, events } = feed(state, delimiters, &fragment);
                state = next_state;
                if let Step::Stop(termination) = forward(renderer, &events).await {
                    renderer_gone = true;
                    break termination;
                }
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, fragments = count, "Response stream failed, finalizing partial output");
                break Termination::Disconnected {
                    reason: e.to_string(),
                };
            }
            None => break Termination::Completed,
        }
    };

    let Split { state, events } = flush(state, delimiters);
    if !renderer_gone {
        renderer_gone = matches!(forward(renderer, &events).await, Step::Stop(_));
    }

    let message = FinalizedMessage::from_state(state);
    if !renderer_gone {
        if let Err(e) = renderer.on_complete(&message).await {
            tracing::debug!(error = %e, "Renderer did not take the completed message");
        }
    }

    tracing::info!(
        fragments = count,
        answer_len = message.answer_text.len(),
        reasoning_blocks = message.reasoning_segments.len(),
        termination = ?termination,
        duration_ms = %started.elapsed().as_millis(),
        "Response finalized"
    );

    TurnOutcome {
        message,
        termination,
        fragments: count,
    }
}

async fn forward<R>(renderer: &mut R, events: &[SplitEvent]) -> Step
where
    R: LiveRenderer + ?Sized,
{
    for event in events {
        match renderer.on_event(event).await {
            Ok(()) => {}
            Err(RenderError::Disconnected) => {
                tracing::info!("Renderer disconnected, ending turn");
                return Step::Stop(Termination::Cancelled);
            }
            Err(RenderError::Io(e)) => {
                tracing::warn!(error = %e, "Renderer failed, ending turn");
                return Step::Stop(Termination::Cancelled);
            }
        }
    }
    Step::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Transcript;
    use async_trait::async_trait;
    use futures::stream;
    use std::convert::Infallible;

    fn ok_fragments(parts: &[&str]) -> impl Stream<Item = Result<String, Infallible>> {
        let items: Vec<Result<String, Infallible>> =
            parts.iter().map(|p| Ok((*p).to_string())).collect();
        stream::iter(items)
    }

    /// Records events and reports disconnection after `limit` events
    struct FlakyRenderer {
        seen: Vec<SplitEvent>,
        limit: usize,
        completed: Option<FinalizedMessage>,
    }

    #[async_trait]
    impl LiveRenderer for FlakyRenderer {
        async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError> {
            if self.seen.len() >= self.limit {
                return Err(RenderError::Disconnected);
            }
            self.seen.push(event.clone());
            Ok(())
        }

        async fn on_complete(&mut self, message: &FinalizedMessage) -> Result<(), RenderError> {
            self.completed = Some(message.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_completed_stream() {
        let mut transcript = Transcript::new();
        let outcome = drive_turn(
            ok_fragments(&["<thi", "nk>plan</th", "ink>The answer", " is 4"]),
            &Delimiters::think(),
            &mut transcript,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(outcome.termination, Termination::Completed);
        assert_eq!(outcome.fragments, 4);
        assert_eq!(outcome.message.answer_text, "The answer is 4.");
        assert_eq!(outcome.message.reasoning_segments, vec!["plan"]);
        assert!(!transcript.in_progress());
        assert_eq!(transcript.answer(), "The answer is 4.");
        assert!(transcript.reasoning()[0].complete);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_still_finalizes() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut transcript = Transcript::new();
        let outcome = drive_turn(
            ok_fragments(&["never read"]),
            &Delimiters::think(),
            &mut transcript,
            &cancel,
        )
        .await;

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.fragments, 0);
        assert_eq!(outcome.message.answer_text, "");
    }

    #[tokio::test]
    async fn test_cancel_mid_stream_keeps_partial() {
        let cancel = CancellationToken::new();
        let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, Infallible>>(4);
        let fragments = tokio_stream::wrappers::ReceiverStream::new(rx);

        tx.send(Ok("Partial <think>reason".into())).await.unwrap();
        tx.send(Ok("ing </thi".into())).await.unwrap();

        let trigger = cancel.clone();
        let driver = tokio::spawn(async move {
            let mut transcript = Transcript::new();
            let outcome = drive_turn(fragments, &Delimiters::think(), &mut transcript, &trigger).await;
            (outcome, transcript)
        });

        // Let the driver consume what has been sent, then cancel
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cancel.cancel();
        let (outcome, transcript) = driver.await.unwrap();
        drop(tx);

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.message.answer_text, "Partial.");
        assert_eq!(outcome.message.reasoning_segments, vec!["reasoning </thi"]);
        assert_eq!(transcript.reasoning()[0].text, "reasoning </thi");
    }

    #[tokio::test]
    async fn test_transport_error_is_a_disconnect() {
        let items: Vec<Result<String, String>> = vec![
            Ok("Half an ans".into()),
            Err("connection reset".into()),
            Ok("never seen".into()),
        ];
        let mut transcript = Transcript::new();
        let outcome = drive_turn(
            stream::iter(items),
            &Delimiters::think(),
            &mut transcript,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(
            outcome.termination,
            Termination::Disconnected {
                reason: "connection reset".into()
            }
        );
        assert_eq!(outcome.message.answer_text, "Half an ans.");
    }

    #[tokio::test]
    async fn test_renderer_disconnect_ends_turn() {
        let mut renderer = FlakyRenderer {
            seen: Vec::new(),
            limit: 1,
            completed: None,
        };
        let outcome = drive_turn(
            ok_fragments(&["one<think>", "two", "</think>three"]),
            &Delimiters::think(),
            &mut renderer,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(outcome.termination, Termination::Cancelled);
        // The first fragment was fully classified before the renderer went away
        assert_eq!(outcome.message.answer_text, "one.");
        assert_eq!(outcome.message.reasoning_segments, vec![String::new()]);
        assert_eq!(renderer.seen, vec![SplitEvent::AnswerText("one".into())]);
        assert_eq!(renderer.completed, None);
    }

    #[test]
    fn test_termination_wire_shape() {
        let value = serde_json::to_value(Termination::Disconnected {
            reason: "eof".into(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"type": "disconnected", "reason": "eof"}));
    }
}
