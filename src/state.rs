use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::availability::{ClientState, initialize};
use crate::config::{CredentialConfig, PromptConfig, load_json_or, save_json};
use crate::generator::GeneratorFactory;
use crate::message::MessageEntry;
use crate::store::ConversationStore;

/// Files the application reads at startup.
#[derive(Debug, Clone)]
pub struct StatePaths {
    pub memory_file: PathBuf,
    pub prompt_file: PathBuf,
    pub config_file: PathBuf,
}

pub(crate) struct Credentials {
    pub(crate) config: CredentialConfig,
    pub(crate) client: ClientState,
}

/// Answer to `GET /config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub has_api_key: bool,
    pub model_available: bool,
}

/// Everything a request handler may touch.
///
/// Chat turns queue on their own lock, so overlapping `/chat` requests are
/// answered one after another. The store and credential locks are only held
/// for bookkeeping, never across a call to the API, which keeps `/memory`,
/// `/clear_memory` and `/config` responsive while a reply is generated.
pub struct AppState {
    pub(crate) prompt: PromptConfig,
    pub(crate) turn: Mutex<()>,
    pub(crate) store: Mutex<ConversationStore>,
    pub(crate) credentials: RwLock<Credentials>,
    credential_path: PathBuf,
    factory: Arc<dyn GeneratorFactory>,
}

impl AppState {
    /// Read configuration and the saved conversation, then validate the key.
    pub async fn load(paths: &StatePaths, factory: Arc<dyn GeneratorFactory>) -> Self {
        let prompt: PromptConfig = load_json_or(&paths.prompt_file, PromptConfig::default()).await;
        info!(system_prompt = %prompt.system_prompt, "system prompt");
        info!(memory_length = prompt.memory_length, "memory length in messages");

        let store = ConversationStore::open(&paths.memory_file).await;
        let config: CredentialConfig =
            load_json_or(&paths.config_file, CredentialConfig::default()).await;
        let client = initialize(&config.gemini_api_key, factory.as_ref()).await;
        info!(state = client.name(), "generation client initialised");

        Self {
            prompt,
            turn: Mutex::new(()),
            store: Mutex::new(store),
            credentials: RwLock::new(Credentials { config, client }),
            credential_path: paths.config_file.clone(),
            factory,
        }
    }

    pub fn prompt_config(&self) -> &PromptConfig {
        &self.prompt
    }

    /// Copy of the full conversation log.
    pub async fn memory(&self) -> Vec<MessageEntry> {
        self.store.lock().await.entries().to_vec()
    }

    /// Empty the log and write the empty log to disk.
    pub async fn clear_memory(&self) {
        let mut store = self.store.lock().await;
        store.clear();
        store.persist().await;
        info!("memory cleared");
    }

    pub async fn config_status(&self) -> ConfigStatus {
        let creds = self.credentials.read().await;
        ConfigStatus {
            has_api_key: creds.config.has_usable_key(),
            model_available: creds.client.is_ready(),
        }
    }

    /// Apply a credential update and rewrite the credential file.
    ///
    /// The client is rebuilt only when `api_key` is present and differs from
    /// the stored key. Validation runs before the credentials are locked, so
    /// readers keep seeing the previous key until the new client is ready.
    /// Returns whether a generator is available afterwards.
    pub async fn update_api_key(&self, api_key: Option<String>) -> bool {
        let current = self.credentials.read().await.config.gemini_api_key.clone();
        let replacement = match api_key {
            Some(key) if key != current => {
                info!("API key updated");
                let client = initialize(&key, self.factory.as_ref()).await;
                Some((key, client))
            }
            _ => None,
        };

        let mut creds = self.credentials.write().await;
        if let Some((key, client)) = replacement {
            creds.config.gemini_api_key = key;
            creds.client = client;
        }
        if let Err(e) = save_json(&self.credential_path, &creds.config).await {
            tracing::error!(path = %self.credential_path.display(), error = %e, "failed to save credentials");
        }
        creds.client.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLACEHOLDER_API_KEY;
    use crate::test_helpers::{GatedGenerator, ScriptedFactory, ScriptedGenerator};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    fn paths(dir: &TempDir) -> StatePaths {
        StatePaths {
            memory_file: dir.path().join("memory.json"),
            prompt_file: dir.path().join("prompt.json"),
            config_file: dir.path().join("config.json"),
        }
    }

    #[tokio::test]
    async fn loads_defaults_when_files_are_missing() {
        let dir = tempdir().unwrap();
        let factory = Arc::new(ScriptedFactory::new(ScriptedGenerator::ok("x")));
        let state = AppState::load(&paths(&dir), factory).await;
        assert_eq!(state.prompt_config(), &PromptConfig::default());
        assert!(state.memory().await.is_empty());
        assert_eq!(
            state.config_status().await,
            ConfigStatus {
                has_api_key: false,
                model_available: false
            }
        );
    }

    #[tokio::test]
    async fn placeholder_key_reports_no_key() {
        let dir = tempdir().unwrap();
        let p = paths(&dir);
        std::fs::write(
            &p.config_file,
            json!({"gemini_api_key": PLACEHOLDER_API_KEY}).to_string(),
        )
        .unwrap();
        let factory = Arc::new(ScriptedFactory::new(ScriptedGenerator::ok("x")));
        let state = AppState::load(&p, factory.clone()).await;
        assert!(!state.config_status().await.has_api_key);
        assert!(factory.built_keys().is_empty());
    }

    #[tokio::test]
    async fn new_key_reinitialises_and_persists() {
        let dir = tempdir().unwrap();
        let p = paths(&dir);
        let factory = Arc::new(ScriptedFactory::new(ScriptedGenerator::ok("x")));
        let state = AppState::load(&p, factory.clone()).await;

        assert!(state.update_api_key(Some("fresh".into())).await);
        assert_eq!(factory.built_keys(), vec!["fresh".to_string()]);
        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&p.config_file).unwrap()).unwrap();
        assert_eq!(saved, json!({"gemini_api_key": "fresh"}));

        assert!(state.update_api_key(Some("fresh".into())).await);
        assert_eq!(factory.built_keys().len(), 1);
    }

    #[tokio::test]
    async fn update_without_key_still_rewrites_file() {
        let dir = tempdir().unwrap();
        let p = paths(&dir);
        let factory = Arc::new(ScriptedFactory::new(ScriptedGenerator::ok("x")));
        let state = AppState::load(&p, factory).await;
        assert!(!state.update_api_key(None).await);
        assert!(p.config_file.exists());
    }

    #[tokio::test]
    async fn status_stays_readable_while_a_new_key_is_validated() {
        let dir = tempdir().unwrap();
        let generator = GatedGenerator::new("ok");
        let factory = Arc::new(ScriptedFactory::new(generator.clone()));
        let state = Arc::new(AppState::load(&paths(&dir), factory.clone()).await);

        let update = tokio::spawn({
            let state = state.clone();
            async move { state.update_api_key(Some("fresh".into())).await }
        });
        tokio::time::timeout(Duration::from_secs(5), async {
            while factory.built_keys().is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("validation never started");

        let status = tokio::time::timeout(Duration::from_secs(5), state.config_status())
            .await
            .expect("status blocked during validation");
        assert_eq!(
            status,
            ConfigStatus {
                has_api_key: false,
                model_available: false
            }
        );

        generator.release();
        assert!(update.await.unwrap());
        assert_eq!(
            state.config_status().await,
            ConfigStatus {
                has_api_key: true,
                model_available: true
            }
        );
    }
}
