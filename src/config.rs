//! JSON configuration and state files.
//!
//! Every loader here falls back to a default instead of failing: a missing,
//! empty or corrupt file is logged and replaced by the caller's default.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Key shipped in the sample credential file. Treated the same as no key.
pub const PLACEHOLDER_API_KEY: &str = "Your-Gemini-API-Key-Here";

/// Prompt settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Text placed at the top of every prompt.
    pub system_prompt: String,
    /// How many trailing log entries are sent to the generator.
    pub memory_length: usize,
    /// Label used for assistant turns and the continuation marker.
    pub assistant_name: String,
    /// Label used for user turns.
    pub user_name: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            memory_length: 8,
            assistant_name: "Neuro".into(),
            user_name: "User".into(),
        }
    }
}

/// Contents of the credential file.
///
/// Fields other than `gemini_api_key` are kept so a rewrite does not drop
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialConfig {
    /// Whether the stored key is worth sending to the API.
    pub fn has_usable_key(&self) -> bool {
        is_usable_key(&self.gemini_api_key)
    }
}

/// Returns `false` for the empty string and the sample placeholder.
pub fn is_usable_key(key: &str) -> bool {
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Load `path` as JSON, returning `default` when it cannot be used.
///
/// # Examples
///
/// ```
/// use neurochat::config::{PromptConfig, load_json_or};
/// # tokio_test::block_on(async {
/// let cfg = load_json_or("does/not/exist.json", PromptConfig::default()).await;
/// assert_eq!(cfg.memory_length, 8);
/// # });
/// ```
pub async fn load_json_or<T, P>(path: P, default: T) -> T
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "file not found, using default value");
            return default;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load file, using default value");
            return default;
        }
    };
    if text.trim().is_empty() {
        warn!(path = %path.display(), "file is empty or corrupted, using default value");
        return default;
    }
    match serde_json::from_str(&text) {
        Ok(value) => {
            debug!(path = %path.display(), "loaded json file");
            value
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "file is empty or corrupted, using default value");
            default
        }
    }
}

/// Overwrite `path` with pretty-printed JSON.
///
/// Non-ASCII text is written as-is rather than escaped.
pub async fn save_json<T, P>(path: P, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, text).await?;
    debug!(path = %path.display(), "wrote json file");
    Ok(())
}
