//! In-memory document store for development and the console driver.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::kernel::{BaseDocumentStore, StoreError};

/// Documents keyed by `(collection, key)`.
///
/// Useful for local runs without a Firestore project. Data is lost on restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    pub fn with_document(self, collection: &str, key: &str, document: Value) -> Self {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert((collection.to_string(), key.to_string()), document);
        }
        self
    }

    pub fn get(&self, collection: &str, key: &str) -> Option<Value> {
        self.documents
            .read()
            .ok()?
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseDocumentStore for MemoryDocumentStore {
    async fn exists(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("memory store lock poisoned")))?;
        Ok(documents.contains_key(&(collection.to_string(), key.to_string())))
    }

    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("memory store lock poisoned")))?;
        documents.insert((collection.to_string(), key.to_string()), document.clone());
        Ok(())
    }
}
