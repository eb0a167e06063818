//! HTTP API
//!
//! Conversations live in memory. A reply is streamed in as the raw model
//! output in the request body and streamed back out as split events over SSE.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
pub use sse::{SseRenderer, WireEvent};
pub use types::*;

use crate::history::Conversation;
use crate::splitter::Delimiters;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<RwLock<HashMap<String, Conversation>>>,
    /// Cancellation handles for replies currently streaming, by conversation id
    pub active_turns: Arc<RwLock<HashMap<String, CancellationToken>>>,
    pub delimiters: Arc<Delimiters>,
}

impl AppState {
    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            active_turns: Arc::new(RwLock::new(HashMap::new())),
            delimiters: Arc::new(delimiters),
        }
    }
}
