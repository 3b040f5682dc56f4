use axum::{extract::State, Json};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::domain::Message;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

pub async fn assistant_handler(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Json<Vec<Message>> {
    Json(
        state
            .assistant
            .respond(&request.message, &request.history)
            .await,
    )
}
