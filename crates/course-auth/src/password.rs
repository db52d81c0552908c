//! Password hashing with Argon2id

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthError;

/// Hash a password into a PHC-format Argon2id digest with a random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check a password against a stored digest
///
/// A wrong password is `Ok(false)`; an unparseable digest is an error.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(digest).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordHash(e.to_string())),
    }
}

/// One-way credential hashing used by registration and login
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, digest: &str) -> Result<bool, AuthError>;

    /// A well-formed digest no password is known for.
    ///
    /// Login verifies against it when the email is unknown so both failure
    /// paths cost one verification.
    fn dummy_digest(&self) -> &str;
}

/// Argon2id hasher with default parameters
pub struct Argon2Hasher {
    dummy_digest: String,
}

impl Argon2Hasher {
    pub fn new() -> Result<Self, AuthError> {
        let dummy_digest = hash_password("timing-equalization-placeholder")?;
        Ok(Self { dummy_digest })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_password(password)
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, AuthError> {
        verify_password(password, digest)
    }

    fn dummy_digest(&self) -> &str {
        &self.dummy_digest
    }
}
