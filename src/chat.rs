use tracing::{info, warn};

use crate::error::GenerationError;
use crate::generator::Generation;
use crate::message::MessageEntry;
use crate::prompt::build_prompt;
use crate::state::AppState;

/// Reply to an empty message. Nothing is logged for it.
pub const EMPTY_MESSAGE_REPLY: &str = "I didn't receive a message.";
/// Reply while no generator is ready.
pub const NOT_CONFIGURED_REPLY: &str = "Gemini API is not configured. Please check your API key.";

/// Turn a generator outcome into reply text or the reason there is none.
///
/// Safety blocks win over empty text; successful text is trimmed.
pub fn classify(outcome: Result<Generation, GenerationError>) -> Result<String, GenerationError> {
    let generation = outcome?;
    if generation.blocked {
        return Err(GenerationError::SafetyFiltered);
    }
    let text = generation.text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text.to_string())
}

impl AppState {
    /// Handle one chat turn.
    ///
    /// Every non-empty message adds a user entry and an assistant entry to
    /// the log, even when generation fails, and the log is saved before the
    /// reply is returned.
    pub async fn respond(&self, user_text: &str) -> String {
        if user_text.is_empty() {
            return EMPTY_MESSAGE_REPLY.to_string();
        }

        let _turn = self.turn.lock().await;
        let (window_len, prompt) = {
            let mut store = self.store.lock().await;
            store.append(MessageEntry::user(user_text));
            let window = store.snapshot(self.prompt.memory_length);
            (window.len(), build_prompt(&self.prompt, window))
        };

        let generator = self.credentials.read().await.client.generator();
        let reply = match generator {
            None => NOT_CONFIGURED_REPLY.to_string(),
            Some(generator) => {
                info!(messages = window_len, "generating response");
                match classify(generator.generate(&prompt).await) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "generation failed");
                        e.user_message()
                    }
                }
            }
        };

        let mut store = self.store.lock().await;
        store.append(MessageEntry::assistant(reply.clone()));
        store.persist().await;
        reply
    }
}
