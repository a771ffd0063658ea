//! Remote document database adapter.

pub mod http_store;

pub use http_store::HttpStore;
