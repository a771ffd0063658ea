//! Auth provider adapters.

pub mod config_auth;

pub use config_auth::ConfigAuth;
