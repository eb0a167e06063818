//! JSON file persistence for a conversation

use super::{Conversation, HistoryResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores one conversation as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored conversation, or start a new one if nothing is stored yet
    pub fn load(&self) -> HistoryResult<Conversation> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No history file, starting fresh");
                Ok(Conversation::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the conversation, replacing the file in one rename
    pub fn save(&self, conversation: &Conversation) -> HistoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(conversation)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            entries = conversation.entries().len(),
            "History saved"
        );
        Ok(())
    }
}
