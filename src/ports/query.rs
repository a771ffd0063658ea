//! Document and query model shared by every `DocumentStore` implementation.
//!
//! A query is a collection scan with at most one equality predicate and one sort key.

use crate::domain::DomainError;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;

pub const MEMBERS: &str = "members";
pub const COMPLAINTS: &str = "complaints";
pub const PAYMENTS: &str = "payments";

/// A stored document: opaque id plus JSON object body (without the id).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Decode into an entity, injecting the document id as `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        let mut body = self.body.clone();
        match body.as_object_mut() {
            Some(obj) => {
                obj.insert("id".to_string(), Value::String(self.id.clone()));
            }
            None => {
                return Err(DomainError::Decode(format!(
                    "document {} is not an object",
                    self.id
                )));
            }
        }
        serde_json::from_value(body).map_err(|e| DomainError::Decode(format!("{}: {}", self.id, e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    pub field: String,
    pub value: Value,
}

/// Collection scan: optional `field == value` filter, optional sort.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<Equals>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            order_by: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// True when the document body satisfies the equality predicate (or there is none).
    pub fn matches(&self, body: &Value) -> bool {
        match &self.filter {
            Some(eq) => body.get(&eq.field) == Some(&eq.value),
            None => true,
        }
    }

    /// Sort documents in place by the query's sort key. Missing fields sort first ascending.
    /// Stable, so equal keys keep insertion order.
    pub fn sort(&self, docs: &mut [Document]) {
        let Some(order) = &self.order_by else {
            return;
        };
        docs.sort_by(|a, b| {
            let ord = compare_values(a.body.get(&order.field), b.body.get(&order.field));
            match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
    }

    /// Apply filter and sort to a full collection scan.
    pub fn apply(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(&d.body)).collect();
        self.sort(&mut out);
        out
    }
}

/// Field names are interpolated into store-specific paths; keep them to plain identifiers.
pub fn is_valid_field(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Ordering over JSON scalars: numbers numerically, RFC 3339 timestamps as instants,
/// other strings lexically, booleans false < true. Mixed or non-scalar values compare
/// equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("a", json!({ "memberId": "m1", "createdAt": "2024-01-02T00:00:00Z" })),
            Document::new("b", json!({ "memberId": "m2", "createdAt": "2024-03-01T00:00:00Z" })),
            Document::new("c", json!({ "memberId": "m1", "createdAt": "2024-02-10T00:00:00Z" })),
        ]
    }

    #[test]
    fn test_filter_and_sort_desc() {
        let q = Query::collection(COMPLAINTS)
            .where_eq("memberId", "m1")
            .order_by("createdAt", Direction::Desc);
        let ids: Vec<String> = q.apply(docs()).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_timestamps_in_same_second_sort_by_instant() {
        let q = Query::collection(COMPLAINTS).order_by("createdAt", Direction::Desc);
        let out = q.apply(vec![
            Document::new("whole", json!({ "createdAt": "2024-06-20T09:00:00Z" })),
            Document::new("half", json!({ "createdAt": "2024-06-20T09:00:00.500Z" })),
            Document::new("offset", json!({ "createdAt": "2024-06-20T11:00:00.250+02:00" })),
        ]);
        let ids: Vec<&str> = out.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["half", "offset", "whole"]);
    }

    #[test]
    fn test_numeric_sort() {
        let q = Query::collection(PAYMENTS).order_by("amount", Direction::Asc);
        let out = q.apply(vec![
            Document::new("x", json!({ "amount": 100 })),
            Document::new("y", json!({ "amount": 20.5 })),
            Document::new("z", json!({})),
        ]);
        let ids: Vec<&str> = out.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_decode_injects_id() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: String,
            name: String,
        }
        let row: Row = Document::new("m9", json!({ "name": "Kim" })).decode().unwrap();
        assert_eq!(row.id, "m9");
        assert_eq!(row.name, "Kim");
        assert!(Document::new("bad", json!([1, 2])).decode::<Row>().is_err());
    }

    #[test]
    fn test_field_names() {
        assert!(is_valid_field("memberId"));
        assert!(!is_valid_field("member.id"));
        assert!(!is_valid_field("x'); DROP"));
    }
}
