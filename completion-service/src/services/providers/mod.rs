//! Completion provider abstraction.
//!
//! A trait-based seam over the upstream backend so the HTTP layer stays
//! independent of the wire protocol and tests can substitute their own
//! implementation.

pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for text-completion backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produces completion text for the prompt. A single attempt; the caller
    /// decides how failures surface.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
