//! Caller identity and the authenticator seam

use course_db::UserRole;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Authenticated caller: who they are and what role they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique user identifier (the account email)
    pub subject: String,
    pub role: UserRole,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: UserRole) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}

/// Turns a presented bearer credential into an [`Identity`].
///
/// Every failure surfaces as [`AuthError::Unauthorized`]. Route handlers only
/// see this trait, so tests can swap in a fixed table of credentials.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}
