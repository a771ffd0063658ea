//! Implements DocumentStore in process memory.
//!
//! Backs the demo mode and the use-case tests. Counts reads and writes so tests can
//! assert that a transition issued no store call.

use crate::domain::DomainError;
use crate::ports::{Document, DocumentStore, Query};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// collection -> documents in insertion order
type Collections = HashMap<String, Vec<Document>>;

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under a caller-chosen id, replacing any existing one.
    pub async fn put(&self, collection: &str, id: &str, body: Value) {
        let mut data = self.data.write().await;
        let docs = data.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.body = body,
            None => docs.push(Document::new(id, body)),
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let data = self.data.read().await;
        Ok(data
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let data = self.data.read().await;
        let docs = data.get(&query.collection).cloned().unwrap_or_default();
        Ok(query.apply(docs))
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<String, DomainError> {
        if !body.is_object() {
            return Err(DomainError::Store("document body must be an object".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut data = self.data.write().await;
        data.entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), body));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DomainError> {
        let Value::Object(fields) = patch else {
            return Err(DomainError::Store("update patch must be an object".into()));
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.write().await;
        let doc = data
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| DomainError::Store(format!("{}/{} not found", collection, id)))?;
        if let Value::Object(body) = &mut doc.body {
            for (k, v) in fields {
                body.insert(k, v);
            }
        }
        Ok(())
    }
}
