//! Image generation routes, one per upstream provider.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::AppError;
use crate::services::providers::modelslab::RealtimeText2ImgOptions;
use crate::services::providers::openai::ImageOptions;
use crate::services::providers::stable_diffusion::Text2ImgOptions;
use crate::startup::AppState;

/// POST /dall-e-3
pub async fn generate_image(
    State(state): State<AppState>,
    Json(options): Json<ImageOptions>,
) -> Result<Json<Value>, AppError> {
    let body = state.openai.generate_image(options).await.map_err(|e| {
        tracing::error!(error = %e, "Image generation request failed");
        AppError::from(e)
    })?;

    Ok(Json(body))
}

/// POST /text2img
pub async fn text_to_image(
    State(state): State<AppState>,
    Json(options): Json<Text2ImgOptions>,
) -> Result<Json<Value>, AppError> {
    let body = state
        .stable_diffusion
        .text_to_image(options)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Stable Diffusion request failed");
            AppError::from(e)
        })?;

    Ok(Json(body))
}

/// POST /text2img2
pub async fn realtime_text_to_image(
    State(state): State<AppState>,
    Json(options): Json<RealtimeText2ImgOptions>,
) -> Result<Json<Value>, AppError> {
    let body = state.modelslab.text_to_image(options).await.map_err(|e| {
        tracing::error!(error = %e, "ModelsLab request failed");
        AppError::from(e)
    })?;

    Ok(Json(body))
}
