//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod bmi;
pub mod edit_session;
pub mod entities;
pub mod errors;
pub mod month;

pub use bmi::{Bmi, BmiCategory};
pub use edit_session::EditSession;
pub use entities::{
    AccountStatus, AdminResponse, Complaint, ComplaintCategory, ComplaintPriority,
    ComplaintStatus, EmergencyContact, Member, Payment, PaymentMethod,
};
pub use errors::DomainError;
pub use month::MonthToken;
