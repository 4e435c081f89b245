//! HTTP handlers for the gateway routes.

pub mod chat;
pub mod images;
pub mod keywords;
pub mod metrics;
