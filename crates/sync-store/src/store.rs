//! The document store seam.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{RemoteDocument, Result};

/// A remote store of documents, each a flat map of key to text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create an empty document and return its id.
    async fn create_document(&self, public: bool, description: &str) -> Result<String>;

    /// Fetch every file of a document.
    async fn read_document(&self, id: &str) -> Result<RemoteDocument>;

    /// Replace the content of the given files in one call.
    async fn write_document(&self, id: &str, files: &BTreeMap<String, String>) -> Result<()>;
}
