//! Keyed in-memory document store.
//!
//! Analyzed documents live under `document-<documentId>` keys, matching the
//! client-side store the result pages read. Nothing is persisted; absence
//! is an expected state, not an error.

use dashmap::DashMap;
use pactum_core::types::StoredDocument;

pub struct DocumentStore {
    inner: DashMap<String, StoredDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    fn key(document_id: &str) -> String {
        format!("document-{}", document_id)
    }

    pub fn insert(&self, document_id: &str, document: StoredDocument) {
        self.inner.insert(Self::key(document_id), document);
    }

    pub fn get(&self, document_id: &str) -> Option<StoredDocument> {
        self.inner
            .get(&Self::key(document_id))
            .map(|entry| entry.value().clone())
    }

    pub fn remove(&self, document_id: &str) -> Option<StoredDocument> {
        self.inner
            .remove(&Self::key(document_id))
            .map(|(_, document)| document)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
