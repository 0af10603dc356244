//! Personal chatbot backend.
//!
//! Accepts chat messages over HTTP, prompts Gemini with the recent
//! conversation and keeps the whole exchange in a JSON log on disk.

pub mod args;
pub mod availability;
pub mod browser;
pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod logger;
pub mod message;
pub mod prompt;
pub mod server;
pub mod shutdown;
pub mod state;
pub mod store;
#[cfg(test)]
pub mod test_helpers;

pub use availability::ClientState;
pub use chat::{EMPTY_MESSAGE_REPLY, NOT_CONFIGURED_REPLY};
pub use error::GenerationError;
pub use gemini::{GeminiClient, GeminiFactory};
pub use generator::{Generation, Generator, GeneratorFactory};
pub use message::{MessageEntry, Role};
pub use server::{ChatServer, serve};
pub use shutdown::shutdown_signal;
pub use state::{AppState, ConfigStatus, StatePaths};
pub use store::ConversationStore;
