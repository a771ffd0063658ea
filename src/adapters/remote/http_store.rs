//! Remote document database over HTTP/JSON. Implements DocumentStore.
//!
//! Endpoints, relative to `base_url`:
//! - `GET    {collection}/{id}`                  -> document object (404 = missing)
//! - `GET    {collection}?where=&equals=&orderBy=&direction=` -> array of documents
//! - `POST   {collection}`                       -> `{ "id": "..." }`
//! - `PATCH  {collection}/{id}`                  -> top-level merge
//!
//! Documents travel as JSON objects carrying their `id` alongside the body fields.

use crate::domain::DomainError;
use crate::ports::{Document, DocumentStore, Query};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Deserialize)]
struct InsertResponse {
    id: String,
}

pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// * `base_url` - API root, e.g. "https://db.example.com/v1"
    /// * `token` - optional bearer token sent with every request
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, collection, id),
            None => format!("{}/{}", self.base_url, collection),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, DomainError> {
        let res = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| DomainError::Store(format!("Request failed: {}", e)))?;
        Ok(res)
    }

    async fn ensure_success(res: reqwest::Response) -> Result<reqwest::Response, DomainError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
        Err(DomainError::Store(format!(
            "document API error {}: {}",
            status, text
        )))
    }

    /// Split the wire object into id + body.
    fn to_document(value: Value) -> Result<Document, DomainError> {
        let Value::Object(mut obj) = value else {
            return Err(DomainError::Decode("document is not an object".into()));
        };
        let id = match obj.remove("id") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => return Err(DomainError::Decode("document without id".into())),
        };
        Ok(Document::new(id, Value::Object(obj)))
    }

    /// Equality values go on the query string as plain text (strings unquoted).
    fn query_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for HttpStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        let res = self.send(self.client.get(self.url(collection, Some(id)))).await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = Self::ensure_success(res).await?;
        let value: Value = res
            .json()
            .await
            .map_err(|e| DomainError::Decode(e.to_string()))?;
        let mut doc = Self::to_document(value)?;
        doc.id = id.to_string();
        Ok(Some(doc))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, DomainError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(eq) = &query.filter {
            params.push(("where", eq.field.clone()));
            params.push(("equals", Self::query_value(&eq.value)));
        }
        if let Some(order) = &query.order_by {
            params.push(("orderBy", order.field.clone()));
            params.push(("direction", order.direction.as_str().to_string()));
        }
        debug!(collection = %query.collection, ?params, "document query");
        let req = self.client.get(self.url(&query.collection, None)).query(&params);
        let res = Self::ensure_success(self.send(req).await?).await?;
        let values: Vec<Value> = res
            .json()
            .await
            .map_err(|e| DomainError::Decode(e.to_string()))?;
        values.into_iter().map(Self::to_document).collect()
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<String, DomainError> {
        let req = self.client.post(self.url(collection, None)).json(&body);
        let res = Self::ensure_success(self.send(req).await?).await?;
        let created: InsertResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DomainError> {
        let req = self.client.patch(self.url(collection, Some(id))).json(&patch);
        Self::ensure_success(self.send(req).await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_building() {
        let store = HttpStore::new("https://db.example.com/v1/", None);
        assert_eq!(store.url("members", Some("m1")), "https://db.example.com/v1/members/m1");
        assert_eq!(store.url("payments", None), "https://db.example.com/v1/payments");
    }

    #[test]
    fn test_to_document_splits_id() {
        let raw = json!({ "id": "c1", "subject": "Broken treadmill" });
        let doc = HttpStore::to_document(raw).unwrap();
        assert_eq!(doc.id, "c1");
        assert_eq!(doc.body, json!({ "subject": "Broken treadmill" }));
        assert!(HttpStore::to_document(json!({ "subject": "x" })).is_err());
    }

    #[test]
    fn test_query_value_text() {
        assert_eq!(HttpStore::query_value(&json!("m1")), "m1");
        assert_eq!(HttpStore::query_value(&json!(true)), "true");
    }
}
