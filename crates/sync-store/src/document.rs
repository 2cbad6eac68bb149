//! In-memory view of one remote document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One file slot inside a remote document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub content: String,
    /// Size in bytes as reported by the store
    #[serde(default)]
    pub size: Option<u64>,
    /// The store cut the inline content short; the full body lives at `raw_url`
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub raw_url: Option<String>,
}

impl RemoteFile {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// The entire remote store state for one document id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteDocument {
    pub id: String,
    /// Login of the owning account; `None` for anonymous documents
    pub owner: Option<String>,
    pub public: bool,
    pub description: Option<String>,
    /// Files keyed by remote key
    pub files: BTreeMap<String, RemoteFile>,
}

impl RemoteDocument {
    /// Content of a file, if present.
    pub fn content(&self, key: &str) -> Option<&str> {
        self.files.get(key).map(|f| f.content.as_str())
    }
}
