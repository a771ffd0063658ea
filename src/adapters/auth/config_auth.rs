//! Implements AuthPort from configuration.
//!
//! The identity is resolved once at startup (env or config file); there is no login flow here.

use crate::domain::DomainError;
use crate::ports::{AuthPort, AuthSession};

pub struct ConfigAuth {
    session: Option<AuthSession>,
}

impl ConfigAuth {
    /// `None` member id means nobody is signed in.
    pub fn new(
        member_id: Option<String>,
        display_name: Option<String>,
        gym_id: Option<String>,
    ) -> Self {
        let session = member_id
            .filter(|id| !id.trim().is_empty())
            .map(|member_id| AuthSession {
                display_name: display_name.unwrap_or_else(|| member_id.clone()),
                member_id,
                gym_id,
            });
        Self { session }
    }

    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self { session: None }
    }
}

#[async_trait::async_trait]
impl AuthPort for ConfigAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>, DomainError> {
        Ok(self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_display_name_falls_back_to_id() {
        let auth = ConfigAuth::new(Some("m42".into()), None, None);
        let s = auth.current_session().await.unwrap().unwrap();
        assert_eq!(s.member_id, "m42");
        assert_eq!(s.display_name, "m42");
    }

    #[tokio::test]
    async fn test_blank_id_is_signed_out() {
        let auth = ConfigAuth::new(Some("  ".into()), Some("Nobody".into()), None);
        assert!(auth.current_session().await.unwrap().is_none());
    }
}
