//! `POST /api/chat` and its streaming variant

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, Stream};

use bookgpt_core::workflows::ChatRequest;

use super::{parse_body, respond, run_workflow};
use crate::api::{ChatPayload, Envelope, PayloadKind, CHAT_VALIDATION_ERROR};
use crate::gateway::GatewayState;
use crate::{GatewayError, Result};

/// Marker sent after the last streamed chunk
pub const STREAM_DONE: &str = "[DONE]";

pub async fn chat(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Envelope<ChatPayload>>> {
    let request = parse_body(PayloadKind::Chat, body)?;
    respond(&state, &state.chat, &request, PayloadKind::Chat, |response| {
        ChatPayload { response }
    })
    .await
    .map_err(chat_rejection)
}

pub async fn chat_stream(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let reply = async {
        let request = parse_body(PayloadKind::Chat, body)?;
        run_workflow(&state, &state.chat, &request, PayloadKind::Chat)
            .await
            .map_err(chat_rejection)
    };

    match reply.await {
        Ok(generated) => Sse::new(word_events(&generated.payload))
            .keep_alive(KeepAlive::default())
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// One event per whitespace-separated word, then the done marker
fn word_events(reply: &str) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    let mut events: Vec<_> = reply
        .split_whitespace()
        .map(|word| {
            let chunk = serde_json::json!({ "chunk": format!("{} ", word) });
            Ok(Event::default().data(chunk.to_string()))
        })
        .collect();
    events.push(Ok(Event::default().data(STREAM_DONE)));
    stream::iter(events)
}

/// Chat validation only concerns `message` and reports it with one fixed text
fn chat_rejection(err: GatewayError) -> GatewayError {
    match err {
        GatewayError::BadRequest { kind, .. } => {
            GatewayError::bad_request(kind, CHAT_VALIDATION_ERROR)
        }
        other => other,
    }
}
