//! HTTP request handlers

use super::sse::{sse_stream, SseRenderer};
use super::types::{ConversationResponse, CreatedResponse, ErrorResponse, MessageRequest};
use super::AppState;
use crate::fragment::decode_utf8;
use crate::history::{Conversation, HistoryError};
use crate::turn::drive_turn;
use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Events buffered per reply stream before the turn waits on the client
const REPLY_CHANNEL_CAPACITY: usize = 64;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations/:id", get(get_conversation))
        .route("/api/conversations/:id/messages", post(send_message))
        .route("/api/conversations/:id/reply", post(stream_reply))
        .route("/api/conversations/:id/cancel", post(cancel_reply))
        .with_state(state)
}

// ============================================================
// Conversations
// ============================================================

async fn create_conversation(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreatedResponse>) {
    let conversation = Conversation::new();
    let id = conversation.id.clone();
    state
        .conversations
        .write()
        .await
        .insert(id.clone(), conversation);

    tracing::info!(conv_id = %id, "Created conversation");
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let conversations = state.conversations.read().await;
    let conversation = conversations
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {id}")))?;
    let replying = state.active_turns.read().await.contains_key(&id);

    Ok(Json(ConversationResponse {
        id: conversation.id.clone(),
        messages: conversation.entries().to_vec(),
        turns: conversation.turns(&state.delimiters),
        awaiting_reply: conversation.awaiting_reply(),
        replying,
    }))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<StatusCode, ApiError> {
    let mut conversations = state.conversations.write().await;
    let conversation = conversations
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {id}")))?;
    conversation.push_user(&req.text)?;

    tracing::debug!(conv_id = %id, "Accepted user message");
    Ok(StatusCode::ACCEPTED)
}

// ============================================================
// Replies
// ============================================================

/// Stream a reply for the pending user message.
///
/// The request body is the raw model output, read fragment by fragment as it
/// arrives. The response is an SSE stream of split events. The finalized
/// message is recorded even when the client goes away mid-stream.
async fn stream_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    let cancel = {
        let conversations = state.conversations.read().await;
        let conversation = conversations
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {id}")))?;
        if !conversation.awaiting_reply() {
            return Err(HistoryError::NoTurnInProgress.into());
        }

        let mut active = state.active_turns.write().await;
        if active.contains_key(&id) {
            return Err(ApiError::Conflict(
                "A reply is already streaming for this conversation".to_string(),
            ));
        }
        let cancel = CancellationToken::new();
        active.insert(id.clone(), cancel.clone());
        cancel
    };

    let (tx, rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);
    let fragments = decode_utf8(body.into_data_stream());

    tokio::spawn(async move {
        let mut renderer = SseRenderer::new(tx);
        let outcome = drive_turn(fragments, &state.delimiters, &mut renderer, &cancel).await;

        {
            let mut conversations = state.conversations.write().await;
            match conversations.get_mut(&id) {
                Some(conversation) => {
                    if let Err(e) = conversation.push_assistant(&outcome.message, &state.delimiters)
                    {
                        tracing::error!(conv_id = %id, error = %e, "Failed to record reply");
                    }
                }
                None => tracing::warn!(conv_id = %id, "Conversation vanished before reply was recorded"),
            }
        }
        state.active_turns.write().await.remove(&id);

        tracing::info!(
            conv_id = %id,
            termination = ?outcome.termination,
            fragments = outcome.fragments,
            "Reply recorded"
        );

        if renderer
            .done(outcome.message, outcome.termination)
            .await
            .is_err()
        {
            tracing::debug!(conv_id = %id, "Client left before the done event");
        }
    });

    Ok(sse_stream(rx))
}

async fn cancel_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let active = state.active_turns.read().await;
    let cancel = active
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("No reply is streaming for {id}")))?;
    cancel.cancel();

    tracing::info!(conv_id = %id, "Reply cancelled by client");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::NoAlphanumeric => ApiError::BadRequest(e.to_string()),
            HistoryError::TurnInProgress | HistoryError::NoTurnInProgress => {
                ApiError::Conflict(e.to_string())
            }
            HistoryError::Io(_) | HistoryError::Json(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
