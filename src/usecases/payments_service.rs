//! Payments use case: member record plus payment history, with derived statistics.
//!
//! - Member and payment list are fetched concurrently on mount
//! - Current-month status, totals and the year list are derived from the fetched list
//! - The year filter, like the complaints filter, never re-fetches

use crate::adapters::export::payments_to_csv;
use crate::domain::{DomainError, Member, MonthToken, Payment};
use crate::ports::{AuthPort, DocumentStore, Direction, PAYMENTS, Query};
use crate::usecases::listing::{ListFilter, LoadedList};
use crate::usecases::profile_service::fetch_member;
use chrono::Datelike;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("All years"),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

impl ListFilter<Payment> for YearFilter {
    fn matches(&self, item: &Payment) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => item.month.year() == *y,
        }
    }
}

/// Statistics derived from the full (unfiltered) payment list.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSummary {
    pub current_month: MonthToken,
    pub current_month_paid: bool,
    /// First record (newest by paid-at) whose month is the current one.
    pub current_month_payment: Option<Payment>,
    pub total_count: usize,
    /// Sum of all amounts; missing amounts count as 0.
    pub total_amount: f64,
    /// Distinct years of the month tokens, newest first.
    pub available_years: Vec<i32>,
}

impl PaymentSummary {
    pub fn derive<D: Datelike>(payments: &[Payment], today: &D) -> Self {
        let current_month = MonthToken::of(today);
        let current_month_payment = payments.iter().find(|p| p.month == current_month).cloned();
        Self {
            current_month,
            current_month_paid: current_month_payment.is_some(),
            current_month_payment,
            total_count: payments.len(),
            total_amount: payments.iter().map(Payment::amount_or_zero).sum(),
            available_years: available_years(payments),
        }
    }
}

/// Distinct year prefixes of all month tokens, sorted descending.
pub fn available_years(payments: &[Payment]) -> Vec<i32> {
    let mut years: Vec<i32> = payments.iter().map(|p| p.month.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

pub struct PaymentsViewer {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthPort>,
    loading: bool,
    member: Option<Member>,
    list: LoadedList<Payment>,
    year_filter: YearFilter,
}

impl PaymentsViewer {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthPort>) -> Self {
        Self {
            store,
            auth,
            loading: true,
            member: None,
            list: LoadedList::default(),
            year_filter: YearFilter::All,
        }
    }

    /// Fetch member and payments concurrently. Each side falls back to empty on failure.
    pub async fn load(&mut self) {
        self.loading = true;
        let session = match self.auth.current_session().await {
            Ok(Some(s)) => s,
            Ok(None) => {
                warn!("no signed-in member; payments not fetched");
                self.loading = false;
                return;
            }
            Err(e) => {
                error!(error = %e, "auth lookup failed");
                self.loading = false;
                return;
            }
        };

        let query = Query::collection(PAYMENTS)
            .where_eq("memberId", session.member_id.as_str())
            .order_by("paidAt", Direction::Desc);
        let store = self.store.as_ref();
        let (member, list) = tokio::join!(
            fetch_member(store, &session.member_id),
            LoadedList::<Payment>::load(store, &query)
        );

        self.member = match member {
            Ok(m) => m,
            Err(e) => {
                error!(member_id = %session.member_id, error = %e, "member fetch failed");
                None
            }
        };
        self.list = list;
        self.loading = false;
        info!(
            member_id = %session.member_id,
            payments = self.list.len(),
            "payments loaded"
        );
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    pub fn payments(&self) -> &[Payment] {
        self.list.items()
    }

    pub fn summary<D: Datelike>(&self, today: &D) -> PaymentSummary {
        PaymentSummary::derive(self.list.items(), today)
    }

    pub fn year_filter(&self) -> YearFilter {
        self.year_filter
    }

    /// In memory only.
    pub fn set_year_filter(&mut self, filter: YearFilter) {
        self.year_filter = filter;
    }

    pub fn visible(&self) -> Vec<&Payment> {
        self.list.filtered(&self.year_filter)
    }

    /// Visible payments as CSV text.
    pub fn export_csv(&self) -> Result<String, DomainError> {
        let rows: Vec<Payment> = self.visible().into_iter().cloned().collect();
        payments_to_csv(&rows).map_err(|e| DomainError::Store(format!("CSV export failed: {}", e)))
    }
}
