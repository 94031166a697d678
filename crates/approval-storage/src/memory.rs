//! In-memory implementation of [`DocumentStore`].
//!
//! [`InMemoryStore`] keeps documents in a `BTreeMap`, so listing is sorted
//! for free. Used by tests and anywhere persistence isn't needed.

use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::traits::DocumentStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: BTreeMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    fn save(&mut self, name: &str, json: &str) -> Result<(), StorageError> {
        self.documents.insert(name.to_string(), json.to_string());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<String, StorageError> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::DocumentNotFound(name.to_string()))
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.documents
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::DocumentNotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.documents.keys().cloned().collect())
    }
}
