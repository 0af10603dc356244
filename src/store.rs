use std::path::PathBuf;

use crate::config::{load_json_or, save_json};
use crate::message::MessageEntry;

/// Ordered conversation log mirrored to a JSON file.
///
/// The in-memory log is the source of truth. [`persist`](Self::persist)
/// rewrites the whole file and a failed write leaves the log untouched.
#[derive(Debug)]
pub struct ConversationStore {
    path: PathBuf,
    entries: Vec<MessageEntry>,
}

impl ConversationStore {
    /// Create an empty store backed by `path` without reading it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Load the log saved at `path`, starting empty if it is unusable.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries: Vec<MessageEntry> = load_json_or(&path, Vec::new()).await;
        tracing::info!(path = %path.display(), count = entries.len(), "loaded conversation");
        Self { path, entries }
    }

    pub fn append(&mut self, entry: MessageEntry) {
        self.entries.push(entry);
    }

    /// The last `limit` entries in chronological order.
    pub fn snapshot(&self, limit: usize) -> &[MessageEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// Full log.
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the backing file with the current log.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn persist(&self) {
        if let Err(e) = save_json(&self.path, &self.entries).await {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save conversation");
        }
    }
}
