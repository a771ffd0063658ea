//! SQLite-backed document store via libsql. Implements DocumentStore.
//!
//! One `documents` table keyed by (collection, id); bodies are JSON text. Equality filters and
//! sort keys are pushed down with `json_extract`. All collections share data/documents.db.

use crate::domain::DomainError;
use crate::ports::query::is_valid_field;
use crate::ports::{Document, DocumentStore, Query};
use libsql::{Database, params};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DOCUMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
)"#;

fn store_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Store(e.to_string())
}

pub struct SqliteStore {
    db: Database,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Connect to (or create) the database and ensure the schema exists.
    /// Call once at startup; the returned store is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(store_err)?;
        let db_path = base.join("documents.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(store_err)?;
        let conn = db.connect().map_err(store_err)?;

        // PRAGMA returns a row; consume it (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(store_err)?.is_some() {}

        conn.execute(DOCUMENTS_TABLE, ()).await.map_err(store_err)?;

        info!(path = %db_path.display(), "SQLite document store connected");
        Ok(Self { db, db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn now_secs() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn parse_body(id: &str, raw: &str) -> Result<Value, DomainError> {
        serde_json::from_str(raw).map_err(|e| DomainError::Decode(format!("{}: {}", id, e)))
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        let conn = self.db.connect().map_err(store_err)?;
        let mut rows = conn
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .await
            .map_err(store_err)?;
        match rows.next().await.map_err(store_err)? {
            Some(row) => {
                let raw: String = row.get(0).map_err(store_err)?;
                Ok(Some(Document::new(id, Self::parse_body(id, &raw)?)))
            }
            None => Ok(None),
        }
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, DomainError> {
        let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?1");
        let filter = match &query.filter {
            Some(eq) => {
                if !is_valid_field(&eq.field) {
                    return Err(DomainError::Store(format!("invalid field '{}'", eq.field)));
                }
                sql.push_str(" AND json_extract(body, ?2) = json_extract(?3, '$')");
                let value = serde_json::to_string(&eq.value).map_err(store_err)?;
                Some((format!("$.{}", eq.field), value))
            }
            None => None,
        };
        let order = match &query.order_by {
            Some(o) => {
                if !is_valid_field(&o.field) {
                    return Err(DomainError::Store(format!("invalid field '{}'", o.field)));
                }
                let slot = if filter.is_some() { 4 } else { 2 };
                sql.push_str(&format!(
                    " ORDER BY json_extract(body, ?{}) {}, rowid ASC",
                    slot,
                    o.direction.as_str().to_uppercase()
                ));
                Some(format!("$.{}", o.field))
            }
            None => {
                sql.push_str(" ORDER BY rowid ASC");
                None
            }
        };
        debug!(collection = %query.collection, sql = %sql, "document query");

        let conn = self.db.connect().map_err(store_err)?;
        let collection = query.collection.as_str();
        let mut rows = match (filter, order) {
            (Some((path, value)), Some(order_path)) => {
                conn.query(&sql, params![collection, path, value, order_path])
                    .await
            }
            (Some((path, value)), None) => conn.query(&sql, params![collection, path, value]).await,
            (None, Some(order_path)) => conn.query(&sql, params![collection, order_path]).await,
            (None, None) => conn.query(&sql, params![collection]).await,
        }
        .map_err(store_err)?;

        let mut docs = Vec::new();
        while let Some(row) = rows.next().await.map_err(store_err)? {
            let id: String = row.get(0).map_err(store_err)?;
            let raw: String = row.get(1).map_err(store_err)?;
            let body = Self::parse_body(&id, &raw)?;
            docs.push(Document::new(id, body));
        }
        // json_extract orders timestamps as text; fractional seconds need an instant compare.
        query.sort(&mut docs);
        Ok(docs)
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<String, DomainError> {
        if !body.is_object() {
            return Err(DomainError::Store("document body must be an object".into()));
        }
        let id = uuid::Uuid::new_v4().simple().to_string();
        let raw = serde_json::to_string(&body).map_err(store_err)?;
        let conn = self.db.connect().map_err(store_err)?;
        conn.execute(
            "INSERT INTO documents (collection, id, body, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![collection, id.as_str(), raw, Self::now_secs()],
        )
        .await
        .map_err(store_err)?;
        info!(collection, id = %id, "document inserted");
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DomainError> {
        let Value::Object(fields) = patch else {
            return Err(DomainError::Store("update patch must be an object".into()));
        };
        let conn = self.db.connect().map_err(store_err)?;
        let tx = conn.transaction().await.map_err(store_err)?;
        let mut rows = tx
            .query(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .await
            .map_err(store_err)?;
        let raw: String = match rows.next().await.map_err(store_err)? {
            Some(row) => row.get(0).map_err(store_err)?,
            None => return Err(DomainError::Store(format!("{}/{} not found", collection, id))),
        };
        drop(rows);

        let mut body = Self::parse_body(id, &raw)?;
        if let Value::Object(existing) = &mut body {
            for (k, v) in fields {
                existing.insert(k, v);
            }
        }
        let merged = serde_json::to_string(&body).map_err(store_err)?;
        tx.execute(
            "UPDATE documents SET body = ?3, updated_at = ?4 WHERE collection = ?1 AND id = ?2",
            params![collection, id, merged, Self::now_secs()],
        )
        .await
        .map_err(store_err)?;
        tx.commit().await.map_err(store_err)?;
        info!(collection, id, "document updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{COMPLAINTS, Direction, MEMBERS};
    use serde_json::json;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gym-portal-{}-{}",
            tag,
            uuid::Uuid::new_v4().simple()
        ))
    }

    #[tokio::test]
    async fn test_insert_query_filter_sort() {
        let dir = temp_dir("query");
        let store = SqliteStore::connect(&dir).await.unwrap();
        for (member, created) in [
            ("m1", "2024-01-01T00:00:00Z"),
            ("m2", "2024-02-01T00:00:00Z"),
            ("m1", "2024-03-01T00:00:00Z"),
        ] {
            store
                .insert(COMPLAINTS, json!({ "memberId": member, "createdAt": created }))
                .await
                .unwrap();
        }
        let q = Query::collection(COMPLAINTS)
            .where_eq("memberId", "m1")
            .order_by("createdAt", Direction::Desc);
        let docs = store.query(&q).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body["createdAt"], "2024-03-01T00:00:00Z");
        assert_eq!(docs[1].body["createdAt"], "2024-01-01T00:00:00Z");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_same_second_timestamps_newest_first() {
        let dir = temp_dir("same-second");
        let store = SqliteStore::connect(&dir).await.unwrap();
        for created in ["2024-06-20T09:00:00.500Z", "2024-06-20T09:00:00Z"] {
            store
                .insert(COMPLAINTS, json!({ "memberId": "m1", "createdAt": created }))
                .await
                .unwrap();
        }
        let q = Query::collection(COMPLAINTS).order_by("createdAt", Direction::Desc);
        let docs = store.query(&q).await.unwrap();
        assert_eq!(docs[0].body["createdAt"], "2024-06-20T09:00:00.500Z");
        assert_eq!(docs[1].body["createdAt"], "2024-06-20T09:00:00Z");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_update_merges_and_get() {
        let dir = temp_dir("update");
        let store = SqliteStore::connect(&dir).await.unwrap();
        let id = store
            .insert(MEMBERS, json!({ "name": "Asha", "height": 160 }))
            .await
            .unwrap();
        store
            .update(MEMBERS, &id, json!({ "weight": 55.5 }))
            .await
            .unwrap();
        let doc = store.get(MEMBERS, &id).await.unwrap().unwrap();
        assert_eq!(doc.body, json!({ "name": "Asha", "height": 160, "weight": 55.5 }));
        assert!(store.get(MEMBERS, "missing").await.unwrap().is_none());
        assert!(store.update(MEMBERS, "missing", json!({})).await.is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_rejects_unsafe_field_names() {
        let dir = temp_dir("fields");
        let store = SqliteStore::connect(&dir).await.unwrap();
        let q = Query::collection(MEMBERS).where_eq("a') OR 1=1 --", "x");
        assert!(store.query(&q).await.is_err());
        let _ = std::fs::remove_dir_all(dir);
    }
}
