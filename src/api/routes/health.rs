use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::infrastructure::http::token_from_env;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub index: String,
    pub token: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Reports whether the assistant's prerequisites are in place: the index
/// file exists and the model token is set.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let settings = &state.config.config;

    let index_present = tokio::fs::try_exists(&settings.rag.index_path)
        .await
        .unwrap_or(false);
    let token_present = token_from_env(&settings.llm.token_env).is_some();
    let ready = index_present && token_present;

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.into(),
        index: if index_present { "present" } else { "missing" }.into(),
        token: if token_present { "set" } else { "missing" }.into(),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
