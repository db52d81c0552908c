//! Authentication extractors

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use course_auth::{AuthError, Identity, extract_bearer_token, require_role};
use course_db::UserRole;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for an authenticated caller (any role)
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let result = authenticate(parts, &app_state);
        if result.is_err() {
            metrics::counter!("course_registry_auth_failures_total").increment(1);
        }
        let identity = result?;

        debug!("Authenticated caller: {} ({})", identity.subject, identity.role);
        Ok(RequireAuth(identity))
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    state.authenticator.authenticate(token)
}

/// Extractor for an administrator
pub struct RequireAdmin(pub Identity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;

        require_role(&identity, UserRole::Admin)?;

        Ok(RequireAdmin(identity))
    }
}
