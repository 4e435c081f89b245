//! Chat completion route.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::AppError;
use crate::services::providers::openai::ChatOptions;
use crate::startup::AppState;

/// POST /chat
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(options): Json<ChatOptions>,
) -> Result<Json<Value>, AppError> {
    let body = state.openai.chat_completion(options).await.map_err(|e| {
        tracing::error!(error = %e, "Chat completion request failed");
        AppError::from(e)
    })?;

    Ok(Json(body))
}
