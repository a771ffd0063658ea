//! Profile editor use case: load the member record, edit a draft, save with derived BMI.
//!
//! - The snapshot is the last persisted record; the draft only exists in edit mode
//! - BMI is previewed live from the draft and written only at save time
//! - A failed save keeps edit mode and the draft so nothing typed is lost

use crate::domain::{Bmi, DomainError, EditSession, Member};
use crate::ports::{AuthPort, DocumentStore, MEMBERS};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How long the "saved" confirmation stays visible.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Transient confirmation shown after a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, shown_at: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at,
            ttl,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }
}

/// Point lookup of a member. `Ok(None)` when the document does not exist.
pub(crate) async fn fetch_member(
    store: &dyn DocumentStore,
    member_id: &str,
) -> Result<Option<Member>, DomainError> {
    match store.get(MEMBERS, member_id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Draft with BMI fields recomputed from its weight/height.
pub fn with_derived_bmi(mut member: Member) -> Member {
    let bmi = Bmi::from_inputs(member.weight, member.height);
    member.bmi = bmi.map(|b| b.value);
    member.bmi_category = bmi.map(|b| b.category);
    member
}

pub struct ProfileEditor {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthPort>,
    notice_ttl: Duration,
    loading: bool,
    session: Option<EditSession<Member>>,
    notice: Option<Notice>,
}

impl ProfileEditor {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthPort>) -> Self {
        Self {
            store,
            auth,
            notice_ttl: DEFAULT_NOTICE_TTL,
            loading: true,
            session: None,
            notice: None,
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Fetch the signed-in member. Any failure ends loading with no profile.
    pub async fn load(&mut self) {
        self.loading = true;
        self.session = match self.try_fetch().await {
            Ok(Some(member)) => {
                info!(member_id = %member.id, "profile loaded");
                Some(EditSession::new(member))
            }
            Ok(None) => {
                warn!("profile not found");
                None
            }
            Err(e) => {
                error!(error = %e, "profile fetch failed");
                None
            }
        };
        self.loading = false;
    }

    async fn try_fetch(&self) -> Result<Option<Member>, DomainError> {
        let Some(session) = self.auth.current_session().await? else {
            return Err(DomainError::Auth("no signed-in member".into()));
        };
        fetch_member(self.store.as_ref(), &session.member_id).await
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_editing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_editing())
    }

    /// Persisted record.
    pub fn profile(&self) -> Option<&Member> {
        self.session.as_ref().map(|s| s.snapshot())
    }

    pub fn draft(&self) -> Option<&Member> {
        self.session.as_ref().and_then(|s| s.draft())
    }

    /// Enter edit mode with a draft seeded from the snapshot. False when nothing is loaded.
    pub fn begin_edit(&mut self) -> bool {
        match self.session.take() {
            Some(s) => {
                self.session = Some(s.begin_edit());
                true
            }
            None => false,
        }
    }

    /// Apply a change to the draft. False when not editing.
    pub fn edit(&mut self, change: impl FnOnce(&mut Member)) -> bool {
        match self.session.as_mut().and_then(|s| s.draft_mut()) {
            Some(draft) => {
                change(draft);
                true
            }
            None => false,
        }
    }

    /// Live BMI of the draft (or of the snapshot outside edit mode).
    pub fn preview_bmi(&self) -> Option<Bmi> {
        let current = self.session.as_ref()?.current();
        Bmi::from_inputs(current.weight, current.height)
    }

    /// Discard the draft. Local only; no store call.
    pub fn cancel(&mut self) {
        if let Some(s) = self.session.take() {
            self.session = Some(s.revert());
        }
    }

    /// Persist the draft with derived BMI fields. On success the snapshot is replaced and a
    /// notice is shown; on failure edit mode and the draft are kept.
    pub async fn save(&mut self, now: Instant) -> Result<(), DomainError> {
        let Some(draft) = self.draft().cloned() else {
            return Err(DomainError::Validation("profile is not in edit mode".into()));
        };
        let merged = with_derived_bmi(draft);
        let patch =
            serde_json::to_value(&merged).map_err(|e| DomainError::Store(e.to_string()))?;

        if let Err(e) = self.store.update(MEMBERS, &merged.id, patch).await {
            error!(member_id = %merged.id, error = %e, "profile save failed");
            return Err(e);
        }

        info!(member_id = %merged.id, bmi = ?merged.bmi, "profile saved");
        if let Some(s) = self.session.take() {
            self.session = Some(s.commit(merged));
        }
        self.notice = Some(Notice::new(
            "Profile updated successfully",
            now,
            self.notice_ttl,
        ));
        Ok(())
    }

    /// The success notice while it is still within its TTL.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_active(now))
    }
}
