//! Server-Sent Events projection of a reply stream

use crate::history::FinalizedMessage;
use crate::render::{LiveRenderer, RenderError};
use crate::splitter::SplitEvent;
use crate::turn::Termination;
use async_trait::async_trait;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// Events sent to SSE clients
#[derive(Debug, Clone, PartialEq)]
pub enum WireEvent {
    Split(SplitEvent),
    /// Sent once the finalized message has been recorded in history
    Done {
        message: FinalizedMessage,
        termination: Termination,
    },
}

/// Renderer that forwards events to an SSE response
pub struct SseRenderer {
    tx: mpsc::Sender<WireEvent>,
}

impl SseRenderer {
    pub fn new(tx: mpsc::Sender<WireEvent>) -> Self {
        Self { tx }
    }

    async fn send(&self, event: WireEvent) -> Result<(), RenderError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| RenderError::Disconnected)
    }

    /// Final event of the stream
    pub async fn done(
        &self,
        message: FinalizedMessage,
        termination: Termination,
    ) -> Result<(), RenderError> {
        self.send(WireEvent::Done {
            message,
            termination,
        })
        .await
    }
}

#[async_trait]
impl LiveRenderer for SseRenderer {
    async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError> {
        self.send(WireEvent::Split(event.clone())).await
    }

    // The message goes out with `done`, after it is recorded
    async fn on_complete(&mut self, _message: &FinalizedMessage) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Convert a channel of wire events into an SSE response
pub fn sse_stream(
    rx: mpsc::Receiver<WireEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = ReceiverStream::new(rx).map(|event| Ok(wire_event_to_axum(event)));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn wire_event_to_axum(event: WireEvent) -> Event {
    let (event_type, data) = wire_event_parts(event);
    Event::default().event(event_type).data(data.to_string())
}

fn wire_event_parts(event: WireEvent) -> (&'static str, serde_json::Value) {
    match event {
        WireEvent::Split(SplitEvent::AnswerText(text)) => ("answer", json!({ "text": text })),
        WireEvent::Split(SplitEvent::ReasoningOpen) => ("reasoning_open", json!({})),
        WireEvent::Split(SplitEvent::ReasoningChunk(text)) => {
            ("reasoning", json!({ "text": text }))
        }
        WireEvent::Split(SplitEvent::ReasoningClose) => ("reasoning_close", json!({})),
        WireEvent::Done {
            message,
            termination,
        } => (
            "done",
            json!({ "message": message, "termination": termination }),
        ),
    }
}
