//! Upstream generative-AI provider clients.
//!
//! Each provider maps a client request into the vendor payload, forwards it
//! and relays the vendor response body verbatim. Defaults for absent fields
//! are applied by an explicit payload-building step on each client so the
//! merge is testable without the network.

pub mod modelslab;
pub mod openai;
pub mod stable_diffusion;

use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}
