//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;
use crate::ports::query::{Document, Query};
use serde_json::Value;

/// Document database client. Collections of JSON documents keyed by opaque ids.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError>;

    /// Collection scan with the query's equality filter and sort applied.
    async fn query(&self, query: &Query) -> Result<Vec<Document>, DomainError>;

    /// Insert a new document. Returns the store-assigned id.
    async fn insert(&self, collection: &str, body: Value) -> Result<String, DomainError>;

    /// Partial update: top-level fields of `patch` overwrite those of the stored document.
    /// No version check; the last write wins.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DomainError>;
}

/// Identity of the signed-in member, as supplied by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub member_id: String,
    pub display_name: String,
    pub gym_id: Option<String>,
}

/// Auth provider port.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    /// Current member, or `None` while nobody is signed in.
    async fn current_session(&self) -> Result<Option<AuthSession>, DomainError>;
}
