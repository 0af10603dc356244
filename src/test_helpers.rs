#![cfg(test)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::error::GenerationError;
use crate::generator::{Generation, Generator, GeneratorFactory};

/// [`Generator`] returning a fixed outcome and recording every prompt.
#[derive(Clone)]
pub struct ScriptedGenerator {
    outcome: Result<Generation, GenerationError>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn returning(generation: Generation) -> Self {
        Self {
            outcome: Ok(generation),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ok(text: &str) -> Self {
        Self::returning(Generation::text(text))
    }

    pub fn failing(err: GenerationError) -> Self {
        Self {
            outcome: Err(err),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone()
    }
}

/// [`Generator`] that answers only after [`release`](Self::release).
///
/// Each release lets exactly one pending or future call through.
#[derive(Clone)]
pub struct GatedGenerator {
    text: String,
    gate: Arc<Notify>,
}

impl GatedGenerator {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            gate: Arc::new(Notify::new()),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Generator for GatedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Generation, GenerationError> {
        self.gate.notified().await;
        Ok(Generation::text(self.text.clone()))
    }
}

/// [`GeneratorFactory`] handing out one shared generator for every key.
pub struct ScriptedFactory {
    generator: Arc<dyn Generator>,
    keys: Mutex<Vec<String>>,
}

impl ScriptedFactory {
    pub fn new(generator: impl Generator + 'static) -> Self {
        Self {
            generator: Arc::new(generator),
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn built_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl GeneratorFactory for ScriptedFactory {
    fn build(&self, api_key: &str) -> Arc<dyn Generator> {
        self.keys.lock().unwrap().push(api_key.to_string());
        self.generator.clone()
    }
}
