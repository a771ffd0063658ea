//! Complaints use case: list the member's complaints, filter by status, file new ones.
//!
//! - One query on mount (memberId scoped, newest first); filters never re-fetch
//! - New complaints are always created `Pending` with no responses
//! - After a successful insert the whole list is fetched again

use crate::domain::{
    Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus, DomainError,
};
use crate::ports::{AuthPort, AuthSession, COMPLAINTS, Direction, DocumentStore, Query};
use crate::usecases::listing::{ListFilter, LoadedList};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Display name stored for anonymous complaints.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ComplaintStatus),
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(ComplaintStatus::Pending),
        StatusFilter::Only(ComplaintStatus::InProgress),
        StatusFilter::Only(ComplaintStatus::Resolved),
    ];
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

impl ListFilter<Complaint> for StatusFilter {
    fn matches(&self, item: &Complaint) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => item.status == *status,
        }
    }
}

/// New-complaint form state.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintForm {
    pub subject: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub description: String,
    pub is_anonymous: bool,
}

impl Default for ComplaintForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            category: ComplaintCategory::Equipment,
            priority: ComplaintPriority::Medium,
            description: String::new(),
            is_anonymous: false,
        }
    }
}

impl ComplaintForm {
    /// Subject and description are required.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.subject.trim().is_empty() {
            return Err(DomainError::Validation("subject is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".into()));
        }
        Ok(())
    }

    /// Build the record to insert: `Pending`, no responses, anonymised display name when asked.
    pub fn to_complaint(&self, member: &AuthSession, now: DateTime<Utc>) -> Complaint {
        Complaint {
            id: String::new(),
            member_id: member.member_id.clone(),
            member_name: if self.is_anonymous {
                ANONYMOUS.to_string()
            } else {
                member.display_name.clone()
            },
            gym_id: member.gym_id.clone(),
            subject: self.subject.trim().to_string(),
            category: self.category,
            priority: self.priority,
            description: self.description.trim().to_string(),
            is_anonymous: self.is_anonymous,
            status: ComplaintStatus::Pending,
            responses: Vec::new(),
            created_at: now,
        }
    }
}

/// At most one dialog is open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComplaintModal {
    #[default]
    Closed,
    NewComplaint(ComplaintForm),
    /// Read-only view of the complaint with this id.
    Detail(String),
}

pub struct ComplaintsManager {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthPort>,
    member: Option<AuthSession>,
    loading: bool,
    list: LoadedList<Complaint>,
    filter: StatusFilter,
    modal: ComplaintModal,
}

impl ComplaintsManager {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthPort>) -> Self {
        Self {
            store,
            auth,
            member: None,
            loading: true,
            list: LoadedList::default(),
            filter: StatusFilter::All,
            modal: ComplaintModal::Closed,
        }
    }

    fn query(member_id: &str) -> Query {
        Query::collection(COMPLAINTS)
            .where_eq("memberId", member_id)
            .order_by("createdAt", Direction::Desc)
    }

    /// Fetch the member's complaints once the identity is known. Without an identity the
    /// screen stays in loading and nothing is fetched.
    pub async fn load(&mut self) {
        self.member = match self.auth.current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "auth lookup failed");
                None
            }
        };
        let Some(member) = &self.member else {
            debug!("no member identity yet; complaints not fetched");
            return;
        };
        self.list = LoadedList::load(self.store.as_ref(), &Self::query(&member.member_id)).await;
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn all(&self) -> &[Complaint] {
        self.list.items()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// In memory only.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Complaint> {
        self.list.filtered(&self.filter)
    }

    /// Badge counts for every filter option, in `StatusFilter::OPTIONS` order.
    pub fn status_counts(&self) -> Vec<(StatusFilter, usize)> {
        StatusFilter::OPTIONS
            .iter()
            .map(|f| (*f, self.list.count_matching(f)))
            .collect()
    }

    pub fn modal(&self) -> &ComplaintModal {
        &self.modal
    }

    pub fn open_new_complaint(&mut self) -> Result<(), DomainError> {
        self.ensure_closed()?;
        self.modal = ComplaintModal::NewComplaint(ComplaintForm::default());
        Ok(())
    }

    pub fn open_detail(&mut self, id: &str) -> Result<(), DomainError> {
        self.ensure_closed()?;
        if !self.list.items().iter().any(|c| c.id == id) {
            return Err(DomainError::Ui(format!("complaint {} is not in the list", id)));
        }
        self.modal = ComplaintModal::Detail(id.to_string());
        Ok(())
    }

    fn ensure_closed(&self) -> Result<(), DomainError> {
        if self.modal != ComplaintModal::Closed {
            return Err(DomainError::Ui("close the open dialog first".into()));
        }
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = ComplaintModal::Closed;
    }

    pub fn form_mut(&mut self) -> Option<&mut ComplaintForm> {
        match &mut self.modal {
            ComplaintModal::NewComplaint(form) => Some(form),
            _ => None,
        }
    }

    /// Complaint shown in the detail dialog, responses in stored order.
    pub fn detail(&self) -> Option<&Complaint> {
        match &self.modal {
            ComplaintModal::Detail(id) => self.list.items().iter().find(|c| &c.id == id),
            _ => None,
        }
    }

    /// Insert the form's complaint, then re-fetch and close the dialog. On failure the
    /// dialog and form stay as they were so the user can resubmit.
    pub async fn submit(&mut self, now: DateTime<Utc>) -> Result<String, DomainError> {
        let ComplaintModal::NewComplaint(form) = &self.modal else {
            return Err(DomainError::Ui("no complaint form is open".into()));
        };
        form.validate()?;
        let Some(member) = self.member.clone() else {
            return Err(DomainError::Auth("no signed-in member".into()));
        };
        let complaint = form.to_complaint(&member, now);
        let body =
            serde_json::to_value(&complaint).map_err(|e| DomainError::Store(e.to_string()))?;

        let id = match self.store.insert(COMPLAINTS, body).await {
            Ok(id) => id,
            Err(e) => {
                error!(member_id = %member.member_id, error = %e, "complaint submit failed");
                return Err(e);
            }
        };
        info!(
            member_id = %member.member_id,
            id = %id,
            anonymous = complaint.is_anonymous,
            "complaint submitted"
        );

        self.list = LoadedList::load(self.store.as_ref(), &Self::query(&member.member_id)).await;
        self.modal = ComplaintModal::Closed;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::ConfigAuth;
    use crate::usecases::test_support::FlakyStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn member() -> AuthSession {
        AuthSession {
            member_id: "m1".into(),
            display_name: "Asha Rao".into(),
            gym_id: Some("g1".into()),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap()
    }

    async fn seeded() -> Arc<FlakyStore> {
        let store = Arc::new(FlakyStore::new());
        let rows = [
            ("c1", "m1", "Pending", 1),
            ("c2", "m1", "Resolved", 3),
            ("c3", "m2", "Pending", 4),
            ("c4", "m1", "In Progress", 5),
            ("c5", "m1", "Pending", 7),
        ];
        for (id, member_id, status, day) in rows {
            let responses = if id == "c2" {
                json!([
                    {
                        "respondedBy": "Front desk",
                        "message": "Looking into it",
                        "respondedAt": "2024-06-03T10:00:00Z"
                    },
                    {
                        "respondedBy": "Manager",
                        "message": "Fixed",
                        "respondedAt": "2024-06-04T10:00:00Z"
                    }
                ])
            } else {
                json!([])
            };
            let created_at = format!("2024-06-{:02}T09:00:00Z", day);
            store
                .inner
                .put(
                    COMPLAINTS,
                    id,
                    json!({
                        "memberId": member_id,
                        "memberName": "Asha Rao",
                        "subject": format!("Subject {}", id),
                        "category": "Equipment",
                        "priority": "High",
                        "description": "Treadmill belt slipping",
                        "isAnonymous": false,
                        "status": status,
                        "responses": responses,
                        "createdAt": created_at,
                    }),
                )
                .await;
        }
        store
    }

    async fn loaded(store: &Arc<FlakyStore>) -> ComplaintsManager {
        let auth = Arc::new(ConfigAuth::signed_in(member()));
        let mut m = ComplaintsManager::new(store.clone(), auth);
        m.load().await;
        m
    }

    fn ids(list: &[&Complaint]) -> Vec<String> {
        list.iter().map(|c| c.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_load_scoped_newest_first() {
        let store = seeded().await;
        let m = loaded(&store).await;
        assert!(!m.is_loading());
        assert_eq!(ids(&m.visible()), vec!["c5", "c4", "c2", "c1"]);
    }

    #[tokio::test]
    async fn test_status_filter_is_exact_subset_without_refetch() {
        let store = seeded().await;
        let mut m = loaded(&store).await;
        let reads = store.inner.read_count();

        m.set_filter(StatusFilter::Only(ComplaintStatus::Pending));
        assert_eq!(ids(&m.visible()), vec!["c5", "c1"]);
        m.set_filter(StatusFilter::Only(ComplaintStatus::InProgress));
        assert_eq!(ids(&m.visible()), vec!["c4"]);
        m.set_filter(StatusFilter::All);
        let all: Vec<&Complaint> = m.all().iter().collect();
        assert_eq!(m.visible(), all);

        assert_eq!(store.inner.read_count(), reads);
    }

    #[tokio::test]
    async fn test_status_counts() {
        let store = seeded().await;
        let m = loaded(&store).await;
        let counts: Vec<usize> = m.status_counts().into_iter().map(|(_, n)| n).collect();
        assert_eq!(counts, vec![4, 2, 1, 1]);
    }

    #[tokio::test]
    async fn test_load_failure_shows_empty_list() {
        let store = seeded().await;
        store.fail_reads(true);
        let m = loaded(&store).await;
        assert!(!m.is_loading());
        assert!(m.visible().is_empty());
    }

    #[tokio::test]
    async fn test_waits_for_identity() {
        let store = seeded().await;
        let mut m = ComplaintsManager::new(store.clone(), Arc::new(ConfigAuth::signed_out()));
        m.load().await;
        assert!(m.is_loading());
        assert_eq!(store.inner.read_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_anonymous_and_named() {
        for (anonymous, expected) in [(true, ANONYMOUS), (false, "Asha Rao")] {
            let store = seeded().await;
            let mut m = loaded(&store).await;
            m.open_new_complaint().unwrap();
            let form = m.form_mut().unwrap();
            form.subject = "Locker broken".into();
            form.category = ComplaintCategory::Facilities;
            form.priority = ComplaintPriority::Low;
            form.description = "Locker 12 does not close".into();
            form.is_anonymous = anonymous;

            let id = m.submit(at(20)).await.unwrap();

            assert_eq!(m.modal(), &ComplaintModal::Closed);
            let created = &m.all()[0];
            assert_eq!(created.id, id);
            assert_eq!(created.member_name, expected);
            assert_eq!(created.status, ComplaintStatus::Pending);
            assert!(created.responses.is_empty());
            assert_eq!(m.all().len(), 5);

            let doc = store.inner.get(COMPLAINTS, &id).await.unwrap().unwrap();
            assert_eq!(doc.body["memberName"], json!(expected));
            assert_eq!(doc.body["status"], json!("Pending"));
            assert_eq!(doc.body["memberId"], json!("m1"));
        }
    }

    #[tokio::test]
    async fn test_submit_requires_fields() {
        let store = seeded().await;
        let mut m = loaded(&store).await;
        m.open_new_complaint().unwrap();
        m.form_mut().unwrap().subject = "Noise".into();
        let err = m.submit(at(20)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.inner.write_count(), 0);
        assert!(m.form_mut().is_some());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_open() {
        let store = seeded().await;
        let mut m = loaded(&store).await;
        m.open_new_complaint().unwrap();
        {
            let form = m.form_mut().unwrap();
            form.subject = "AC not working".into();
            form.description = "Too hot in the weights area".into();
        }
        store.fail_writes(true);
        assert!(m.submit(at(20)).await.is_err());
        assert_eq!(m.form_mut().unwrap().subject, "AC not working");
        assert_eq!(m.all().len(), 4);

        store.fail_writes(false);
        m.submit(at(20)).await.unwrap();
        assert_eq!(m.all().len(), 5);
    }

    #[tokio::test]
    async fn test_detail_shows_responses_in_order() {
        let store = seeded().await;
        let mut m = loaded(&store).await;
        m.open_detail("c2").unwrap();
        let c = m.detail().unwrap();
        let authors: Vec<&str> = c.responses.iter().map(|r| r.responded_by.as_str()).collect();
        assert_eq!(authors, vec!["Front desk", "Manager"]);
        assert!(m.open_new_complaint().is_err());
        m.close_modal();
        assert!(m.open_new_complaint().is_ok());
        assert!(m.detail().is_none());
    }
}
