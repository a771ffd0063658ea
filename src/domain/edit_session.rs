//! Snapshot/draft pair for self-service editing.
//!
//! Transitions consume the session and return the next one, so every step is a pure value change.

/// Last-persisted snapshot plus, while editing, an independent draft copy.
#[derive(Debug, Clone, PartialEq)]
pub enum EditSession<T> {
    Viewing { snapshot: T },
    Editing { snapshot: T, draft: T },
}

impl<T: Clone> EditSession<T> {
    pub fn new(snapshot: T) -> Self {
        EditSession::Viewing { snapshot }
    }

    /// Seed the draft from the snapshot. No-op when already editing.
    pub fn begin_edit(self) -> Self {
        match self {
            EditSession::Viewing { snapshot } => {
                let draft = snapshot.clone();
                EditSession::Editing { snapshot, draft }
            }
            editing => editing,
        }
    }

    /// Discard the draft; the snapshot is untouched.
    pub fn revert(self) -> Self {
        match self {
            EditSession::Editing { snapshot, .. } => EditSession::Viewing { snapshot },
            viewing => viewing,
        }
    }

    /// Replace the snapshot with what was persisted and leave edit mode.
    pub fn commit(self, saved: T) -> Self {
        EditSession::Viewing { snapshot: saved }
    }

    pub fn snapshot(&self) -> &T {
        match self {
            EditSession::Viewing { snapshot } | EditSession::Editing { snapshot, .. } => snapshot,
        }
    }

    pub fn draft(&self) -> Option<&T> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Viewing { .. } => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Viewing { .. } => None,
        }
    }

    /// Draft while editing, snapshot otherwise.
    pub fn current(&self) -> &T {
        self.draft().unwrap_or_else(|| self.snapshot())
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }
}
