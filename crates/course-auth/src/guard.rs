//! Request-boundary checks: bearer extraction and role guard

use course_db::UserRole;
use tracing::debug;

use crate::error::AuthError;
use crate::identity::Identity;

/// Extract bearer token from an authorization header value
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Require the caller to hold exactly `required`
pub fn require_role(identity: &Identity, required: UserRole) -> Result<(), AuthError> {
    if identity.role != required {
        debug!(
            "Access denied for {}: role {} does not match required {}",
            identity.subject, identity.role, required
        );
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123").unwrap(), "abc123");

        for bad in ["abc123", "Basic abc123", "bearer abc123", "Bearer ", "Bearer", ""] {
            assert!(
                matches!(extract_bearer_token(bad), Err(AuthError::InvalidAuthHeader)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_require_role_exact_match() {
        let admin = Identity::new("ada@example.com", UserRole::Admin);
        let user = Identity::new("bob@example.com", UserRole::User);

        assert!(require_role(&admin, UserRole::Admin).is_ok());
        assert!(require_role(&user, UserRole::User).is_ok());
        assert!(matches!(require_role(&user, UserRole::Admin), Err(AuthError::Forbidden)));
        assert!(matches!(require_role(&admin, UserRole::User), Err(AuthError::Forbidden)));
    }
}
