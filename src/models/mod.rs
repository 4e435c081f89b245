//! Domain models for the gateway.

mod keyword;

pub use keyword::{AddKeywords, Keyword};
