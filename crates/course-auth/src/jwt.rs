//! Bearer token encoding and verification

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use course_db::UserRole;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::identity::{Authenticator, Identity};

/// Default token lifetime when none is configured
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Longest configurable token lifetime (30 days)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// User role, as stored (`"Admin"` or `"User"`)
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Convert verified claims into an identity.
    ///
    /// Both a non-empty subject and a known role are required.
    fn into_identity(self) -> Result<Identity, AuthError> {
        if self.sub.is_empty() {
            debug!("Token rejected: empty subject");
            return Err(AuthError::InvalidToken);
        }
        let role = UserRole::from_str(&self.role).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;
        Ok(Identity::new(self.sub, role))
    }
}

/// Signing configuration, fixed for the lifetime of the process
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenConfig {
    /// Validate and build the signing configuration.
    ///
    /// Only the symmetric HMAC algorithms are accepted since a single shared
    /// secret both signs and verifies.
    pub fn new(secret: &str, algorithm: &str, ttl_minutes: i64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("signing secret must not be empty".to_string()));
        }

        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::Config(format!("unknown signing algorithm '{}'", algorithm)))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Config(format!(
                "signing algorithm {:?} is not a symmetric HMAC algorithm",
                algorithm
            )));
        }

        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl_minutes) {
            return Err(AuthError::Config(format!(
                "token ttl must be between 1 and {} minutes, got {}",
                MAX_TOKEN_TTL_MINUTES, ttl_minutes
            )));
        }
        let default_ttl = Duration::try_minutes(ttl_minutes).ok_or_else(|| {
            AuthError::Config(format!("token ttl of {} minutes is out of range", ttl_minutes))
        })?;

        Ok(Self {
            secret: secret.to_string(),
            algorithm,
            default_ttl,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

/// Token codec for issuing and verifying bearer tokens
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec from validated configuration
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            default_ttl: config.default_ttl,
        }
    }

    /// Lifetime applied when `encode` is called without an explicit ttl
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a signed token for an identity
    pub fn encode(&self, identity: &Identity, ttl: Option<Duration>) -> Result<String, AuthError> {
        self.encode_at(identity, ttl, Utc::now())
    }

    fn encode_at(
        &self,
        identity: &Identity,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::TokenIssue(format!("expiry overflows with ttl of {} seconds", ttl.num_seconds()))
        })?;

        let claims = Claims {
            sub: identity.subject.clone(),
            role: identity.role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Generating token for subject: {}", identity.subject);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Verify a token and return the identity it carries
    pub fn decode(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Token validation failed: {}", e);
            AuthError::InvalidToken
        })?;

        // The library accepts exp == now; the token must be strictly unexpired
        let now = Utc::now().timestamp();
        if token_data.claims.exp <= now {
            debug!("Token rejected: expired");
            return Err(AuthError::InvalidToken);
        }

        token_data.claims.into_identity()
    }
}

impl Authenticator for TokenCodec {
    fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        self.decode(token).map_err(|_| AuthError::Unauthorized)
    }
}
