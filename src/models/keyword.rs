//! Keyword model for categorized prompt keywords.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored keyword row. The (category, word) pair is unique.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Keyword {
    pub category: String,
    pub word: String,
}

/// Input for bulk-adding keywords under one category.
#[derive(Debug, Clone, Deserialize)]
pub struct AddKeywords {
    pub category: String,
    pub keywords: Vec<String>,
}
