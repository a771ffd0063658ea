//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by UI/adapter into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;
pub mod query;

pub use inbound::InputPort;
pub use outbound::{AuthPort, AuthSession, DocumentStore};
pub use query::{COMPLAINTS, Direction, Document, MEMBERS, PAYMENTS, Query};
