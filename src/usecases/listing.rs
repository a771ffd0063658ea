//! Load once, filter in memory.
//!
//! A list screen issues one store query on mount; every filter change afterwards runs over
//! the already-fetched items and never touches the store.

use crate::domain::DomainError;
use crate::ports::{DocumentStore, Query};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// In-memory predicate over loaded items.
pub trait ListFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Items fetched by a single query, in the order the store returned them.
#[derive(Debug, Clone)]
pub struct LoadedList<T> {
    items: Vec<T>,
}

impl<T> Default for LoadedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: DeserializeOwned> LoadedList<T> {
    /// Run the query and decode the results. A failed fetch yields an empty list;
    /// documents that fail to decode are skipped.
    pub async fn load(store: &dyn DocumentStore, query: &Query) -> Self {
        match Self::try_load(store, query).await {
            Ok(list) => list,
            Err(e) => {
                warn!(
                    collection = %query.collection,
                    error = %e,
                    "list fetch failed; showing empty list"
                );
                Self::default()
            }
        }
    }

    /// Like [`LoadedList::load`] but surfaces the fetch error.
    pub async fn try_load(store: &dyn DocumentStore, query: &Query) -> Result<Self, DomainError> {
        let docs = store.query(query).await?;
        let total = docs.len();
        let items: Vec<T> = docs
            .iter()
            .filter_map(|doc| match doc.decode::<T>() {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(
                        collection = %query.collection,
                        id = %doc.id,
                        error = %e,
                        "skipping undecodable document"
                    );
                    None
                }
            })
            .collect();
        info!(
            collection = %query.collection,
            count = items.len(),
            skipped = total - items.len(),
            "list loaded"
        );
        Ok(Self { items })
    }
}

impl<T> LoadedList<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Matching items, order preserved.
    pub fn filtered<F: ListFilter<T>>(&self, filter: &F) -> Vec<&T> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    pub fn count_matching<F: ListFilter<T>>(&self, filter: &F) -> usize {
        self.items.iter().filter(|item| filter.matches(item)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStore;
    use crate::ports::Direction;
    use crate::usecases::test_support::FlakyStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
        n: i64,
    }

    struct Even;

    impl ListFilter<Row> for Even {
        fn matches(&self, item: &Row) -> bool {
            item.n % 2 == 0
        }
    }

    #[tokio::test]
    async fn test_filter_runs_in_memory() {
        let store = MemoryStore::new();
        for (id, n) in [("a", 1), ("b", 2), ("c", 4)] {
            store.put("rows", id, json!({ "n": n })).await;
        }
        let q = Query::collection("rows").order_by("n", Direction::Desc);
        let list: LoadedList<Row> = LoadedList::load(&store, &q).await;
        let reads = store.read_count();

        let even: Vec<&str> = list.filtered(&Even).into_iter().map(|r| r.id.as_str()).collect();
        assert_eq!(even, vec!["c", "b"]);
        assert_eq!(list.count_matching(&Even), 2);
        assert_eq!(store.read_count(), reads);
    }

    #[tokio::test]
    async fn test_undecodable_documents_are_skipped() {
        let store = MemoryStore::new();
        store.put("rows", "ok", json!({ "n": 1 })).await;
        store.put("rows", "bad", json!({ "n": "one" })).await;
        let list: LoadedList<Row> = LoadedList::load(&store, &Query::collection("rows")).await;
        assert_eq!(list.items(), &[Row { id: "ok".into(), n: 1 }]);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty() {
        let store = FlakyStore::new();
        store.inner.put("rows", "a", json!({ "n": 1 })).await;
        store.fail_reads(true);
        let list: LoadedList<Row> = LoadedList::load(&store, &Query::collection("rows")).await;
        assert!(list.is_empty());
        assert!(
            LoadedList::<Row>::try_load(&store, &Query::collection("rows"))
                .await
                .is_err()
        );
    }
}
