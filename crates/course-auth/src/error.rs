//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The token failed signature, algorithm, expiry or claim checks
    #[error("Invalid token")]
    InvalidToken,

    /// The presented credential does not authenticate anyone
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    /// Authenticated, but the role does not match the operation
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Signing a freshly issued token failed
    #[error("Token issue error: {0}")]
    TokenIssue(String),

    #[error("Token configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::Unauthorized
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) | AuthError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) | AuthError::Config(_) => {
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_and_forbidden_are_distinct() {
        assert_eq!(AuthError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MissingAuthHeader.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AuthError::PasswordHash("salt too short".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AuthError::TokenIssue("expiry overflows".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
