//! Application state

use course_auth::{Authenticator, CredentialHasher, TokenCodec};
use course_db::Database;
use std::sync::Arc;

/// Prometheus render handle served on `/metrics`
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Issues tokens at login
    pub tokens: Arc<TokenCodec>,
    /// Verifies tokens on protected routes
    pub authenticator: Arc<dyn Authenticator>,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenCodec>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            db,
            authenticator: tokens.clone(),
            tokens,
            hasher,
        }
    }

    /// Replace the authenticator used by protected routes
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }
}
