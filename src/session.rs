//! Caller sessions.
//!
//! A [`Session`] holds the credential obtained at sign-in. Every store call
//! takes that credential explicitly; a session with no credential fails with
//! [`EngineError::Unauthorized`] before anything is attempted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Proof of identity presented to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    /// The user the data belongs to.
    pub user_id: String,
    /// Opaque bearer token.
    pub token: String,
    /// When the credential was issued.
    pub issued_at: DateTime<Utc>,
}

impl Credential {
    /// Issues a fresh credential for a user.
    ///
    /// User identifiers are compared case-insensitively and without
    /// surrounding whitespace.
    pub fn issue(user_id: &str) -> Self {
        Self {
            user_id: user_id.trim().to_lowercase(),
            token: Uuid::new_v4().to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// The caller's authentication state.
///
/// # Example
///
/// ```
/// use rental_ledger::session::{Credential, Session};
///
/// let mut session = Session::new();
/// assert!(session.credential().is_err());
///
/// session.sign_in(Credential::issue("owner@example.com"));
/// assert_eq!(session.credential().unwrap().user_id, "owner@example.com");
///
/// session.sign_out();
/// assert!(!session.is_authenticated());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already holding a credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Stores the credential, replacing any previous one.
    pub fn sign_in(&mut self, credential: Credential) {
        tracing::info!(user_id = %credential.user_id, "Signed in");
        self.credential = Some(credential);
    }

    /// Drops the credential and returns it.
    pub fn sign_out(&mut self) -> Option<Credential> {
        let credential = self.credential.take();
        if let Some(c) = &credential {
            tracing::info!(user_id = %c.user_id, "Signed out");
        }
        credential
    }

    /// Drops a credential the store refused.
    pub fn reject(&mut self) {
        if let Some(c) = self.credential.take() {
            tracing::warn!(user_id = %c.user_id, "Credential rejected, session cleared");
        }
    }

    /// Returns true while a credential is held.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Returns the held credential.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] when signed out.
    pub fn credential(&self) -> EngineResult<&Credential> {
        self.credential.as_ref().ok_or_else(|| EngineError::Unauthorized {
            reason: "not signed in".to_string(),
        })
    }

    /// Runs a store call with the held credential, clearing the session if
    /// the store refuses it.
    pub fn authorized<T>(
        &mut self,
        call: impl FnOnce(&Credential) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let result = call(self.credential()?);
        if let Err(EngineError::Unauthorized { .. }) = &result {
            self.reject();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_normalizes_user_id() {
        let credential = Credential::issue("  Owner@Example.COM ");
        assert_eq!(credential.user_id, "owner@example.com");
        assert!(!credential.token.is_empty());
    }

    #[test]
    fn test_signed_out_session_is_unauthorized() {
        let session = Session::new();
        assert!(matches!(
            session.credential(),
            Err(EngineError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_authorized_passes_credential() {
        let mut session = Session::with_credential(Credential::issue("owner"));
        let user = session.authorized(|c| Ok(c.user_id.clone())).unwrap();
        assert_eq!(user, "owner");
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_authorized_clears_session_on_rejection() {
        let mut session = Session::with_credential(Credential::issue("owner"));
        let result: EngineResult<()> = session.authorized(|_| {
            Err(EngineError::Unauthorized {
                reason: "token expired".to_string(),
            })
        });
        assert!(result.is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_authorized_keeps_session_on_other_errors() {
        let mut session = Session::with_credential(Credential::issue("owner"));
        let result: EngineResult<()> =
            session.authorized(|_| Err(EngineError::not_found("technique", "tech_001")));
        assert!(result.is_err());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_sign_out_returns_credential() {
        let credential = Credential::issue("owner");
        let mut session = Session::with_credential(credential.clone());
        assert_eq!(session.sign_out(), Some(credential));
        assert_eq!(session.sign_out(), None);
    }
}
