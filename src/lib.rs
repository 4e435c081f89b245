//! GenAI Gateway - HTTP pass-through to generative-AI providers plus keyword storage.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
