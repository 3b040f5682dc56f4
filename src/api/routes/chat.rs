use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Serialized as `{"response": ...}` or `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatResponse {
    Response(serde_json::Value),
    Error(String),
}

/// Forwards the message to the hosted Space. Failures are reported in the
/// body; the status is 200 either way.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    match state.remote_chat.predict(&request.message).await {
        Ok(result) => Json(ChatResponse::Response(result)),
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "remote chat failed");
            Json(ChatResponse::Error(e.to_string()))
        }
    }
}
