//! Data export adapters.

pub mod payments_csv;

pub use payments_csv::payments_to_csv;
