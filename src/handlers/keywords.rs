//! Keyword storage routes.

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::models::{AddKeywords, Keyword};
use crate::startup::AppState;

/// GET /keywords
pub async fn list_keywords(
    State(state): State<AppState>,
) -> Result<Json<Vec<Keyword>>, AppError> {
    let rows = state.db.list_keywords().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list keywords");
        e
    })?;

    Ok(Json(rows))
}

/// POST /keywords
pub async fn add_keywords(
    State(state): State<AppState>,
    Json(input): Json<AddKeywords>,
) -> Result<&'static str, AppError> {
    state
        .db
        .add_keywords(&input.category, &input.keywords)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, category = %input.category, "Failed to add keywords");
            e
        })?;

    Ok("Keywords added successfully")
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = state.db.list_categories().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list categories");
        e
    })?;

    Ok(Json(categories))
}
