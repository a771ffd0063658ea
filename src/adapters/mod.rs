//! Infrastructure adapters. Implement outbound ports.
//!
//! Document stores, auth, export, terminal UI. Map errors to DomainError.

pub mod auth;
pub mod export;
pub mod persistence;
pub mod remote;
pub mod ui;
