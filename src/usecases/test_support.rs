//! Test doubles shared by the use-case tests.

use crate::adapters::persistence::MemoryStore;
use crate::domain::DomainError;
use crate::ports::{Document, DocumentStore, Query};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

/// MemoryStore whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            Err(DomainError::Store("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        Self::check(&self.fail_reads)?;
        self.inner.get(collection, id).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, DomainError> {
        Self::check(&self.fail_reads)?;
        self.inner.query(query).await
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<String, DomainError> {
        Self::check(&self.fail_writes)?;
        self.inner.insert(collection, body).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DomainError> {
        Self::check(&self.fail_writes)?;
        self.inner.update(collection, id, patch).await
    }
}
