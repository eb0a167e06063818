//! Live rendering of split events
//!
//! Renderers are pure projections of the splitter's event sequence. They hold
//! no parsing logic of their own.

mod terminal;
mod transcript;

pub use terminal::TerminalRenderer;
pub use transcript::{ReasoningRegion, Transcript, IN_PROGRESS_MARKER};

use crate::history::FinalizedMessage;
use crate::splitter::SplitEvent;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render output failed: {0}")]
    Io(#[from] std::io::Error),
    /// The consumer went away; the turn should end as if cancelled
    #[error("Render target disconnected")]
    Disconnected,
}

/// Consumer of one response's split events
#[async_trait]
pub trait LiveRenderer: Send {
    /// Called for every event, in delivery order
    async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError>;

    /// Called once when the stream has ended and the message is finalized
    async fn on_complete(&mut self, message: &FinalizedMessage) -> Result<(), RenderError>;
}

#[async_trait]
impl<R: LiveRenderer + ?Sized> LiveRenderer for Box<R> {
    async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError> {
        (**self).on_event(event).await
    }

    async fn on_complete(&mut self, message: &FinalizedMessage) -> Result<(), RenderError> {
        (**self).on_complete(message).await
    }
}
