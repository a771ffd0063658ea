//! gym-portal: member self-service settings (profile, complaints, payments)
//! with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
