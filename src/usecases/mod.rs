//! Application use cases. One per member settings screen, orchestrating domain logic via ports.

pub mod complaints_service;
pub mod listing;
pub mod payments_service;
pub mod profile_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use complaints_service::{ComplaintForm, ComplaintModal, ComplaintsManager, StatusFilter};
pub use listing::{ListFilter, LoadedList};
pub use payments_service::{PaymentSummary, PaymentsViewer, YearFilter};
pub use profile_service::{Notice, ProfileEditor};
