use async_trait::async_trait;
use std::sync::Arc;

use crate::error::GenerationError;

/// Raw outcome of a successful API call, before it is turned into a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Concatenated text of the first candidate. May be empty.
    pub text: String,
    /// Set when the API stopped the response for safety reasons.
    pub blocked: bool,
}

impl Generation {
    /// A plain text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocked: false,
        }
    }

    /// A response withheld by the safety filter.
    pub fn blocked() -> Self {
        Self {
            text: String::new(),
            blocked: true,
        }
    }
}

/// Text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a continuation of `prompt` in a single attempt.
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

/// Builds a [`Generator`] for a given API key.
///
/// The chat service rebuilds its generator through this whenever the key
/// changes.
pub trait GeneratorFactory: Send + Sync {
    fn build(&self, api_key: &str) -> Arc<dyn Generator>;
}
