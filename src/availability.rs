//! Whether a usable generator is available for the configured key.
//!
//! [`initialize`] runs `Unconfigured -> Validating -> Ready | Invalid` in one
//! call; only the settled states are observable.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::is_usable_key;
use crate::generator::{Generator, GeneratorFactory};

/// Prompt used to check a freshly configured key.
pub const VALIDATION_PROMPT: &str = "test";

/// Settled availability of the generation client.
#[derive(Clone)]
pub enum ClientState {
    /// No key, or the sample placeholder.
    Unconfigured,
    /// The API said the key is not valid.
    Invalid,
    /// Usable, possibly after a validation failure unrelated to the key.
    Ready(Arc<dyn Generator>),
}

impl ClientState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn generator(&self) -> Option<Arc<dyn Generator>> {
        match self {
            Self::Ready(g) => Some(g.clone()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Invalid => "invalid",
            Self::Ready(_) => "ready",
        }
    }
}

impl fmt::Debug for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build and validate a generator for `api_key`.
///
/// A failed check only yields [`ClientState::Invalid`] when the API rejects
/// the key itself; network trouble, quota and the like keep the client.
pub async fn initialize(api_key: &str, factory: &dyn GeneratorFactory) -> ClientState {
    if !is_usable_key(api_key) {
        warn!("no API key provided for Gemini");
        return ClientState::Unconfigured;
    }
    let generator = factory.build(api_key);
    info!("validating API key");
    match generator.generate(VALIDATION_PROMPT).await {
        Ok(_) => {
            info!("API key verified");
            ClientState::Ready(generator)
        }
        Err(e) if e.is_key_rejected() => {
            warn!(error = %e, "API key rejected");
            ClientState::Invalid
        }
        Err(e) => {
            warn!(error = %e, "validation failed for a reason other than the key, keeping client");
            ClientState::Ready(generator)
        }
    }
}
