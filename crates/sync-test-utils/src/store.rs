//! [`MemoryStore`]: an in-memory document store that records every call.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sync_store::{DocumentStore, Error, RemoteDocument, RemoteFile, Result};

#[derive(Default)]
struct State {
    documents: BTreeMap<String, RemoteDocument>,
    created: Vec<(bool, String)>,
    writes: Vec<(String, BTreeMap<String, String>)>,
    next_id: usize,
}

/// Document store kept in memory.
///
/// Writes merge into the stored document the way a gist PATCH does. Each
/// operation can be made to fail.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    owner: Option<String>,
    fail_create: bool,
    fail_read: bool,
    fail_write: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner reported for every document created or inserted afterwards.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    /// Seed a document with the given files.
    pub fn insert(&self, id: &str, public: bool, files: &[(&str, &str)]) {
        let document = RemoteDocument {
            id: id.to_string(),
            owner: self.owner.clone(),
            public,
            description: None,
            files: files
                .iter()
                .map(|(k, v)| (k.to_string(), RemoteFile::new(*v)))
                .collect(),
        };
        self.state.lock().unwrap().documents.insert(id.to_string(), document);
    }

    /// Current content of every file in a document.
    pub fn files(&self, id: &str) -> BTreeMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .documents
            .get(id)
            .map(|d| {
                d.files
                    .iter()
                    .map(|(k, f)| (k.clone(), f.content.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes.len()
    }

    /// File maps passed to `write_document`, in call order.
    pub fn writes(&self) -> Vec<(String, BTreeMap<String, String>)> {
        self.state.lock().unwrap().writes.clone()
    }

    /// `(public, description)` of every `create_document` call.
    pub fn created(&self) -> Vec<(bool, String)> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, public: bool, description: &str) -> Result<String> {
        if self.fail_create {
            return Err(Error::Api {
                status: 500,
                message: "create refused".into(),
            });
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("gist-{}", state.next_id);
        state.created.push((public, description.to_string()));
        state.documents.insert(
            id.clone(),
            RemoteDocument {
                id: id.clone(),
                owner: self.owner.clone(),
                public,
                description: Some(description.to_string()),
                files: BTreeMap::from([("cloudSettings".to_string(), RemoteFile::new("// Empty"))]),
            },
        );
        Ok(id)
    }

    async fn read_document(&self, id: &str) -> Result<RemoteDocument> {
        if self.fail_read {
            return Err(Error::Network("connection reset".into()));
        }
        self.state
            .lock()
            .unwrap()
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    async fn write_document(&self, id: &str, files: &BTreeMap<String, String>) -> Result<()> {
        if self.fail_write {
            return Err(Error::Unauthorized);
        }
        let mut state = self.state.lock().unwrap();
        state.writes.push((id.to_string(), files.clone()));
        let document = state
            .documents
            .get_mut(id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        for (key, content) in files {
            document.files.insert(key.clone(), RemoteFile::new(content.as_str()));
        }
        Ok(())
    }
}
