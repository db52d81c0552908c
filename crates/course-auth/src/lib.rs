//! Course Registry Authentication and Authorization
//!
//! This crate provides signed, time-bounded bearer tokens, the
//! authenticator that turns a presented token into an [`Identity`],
//! the role guard used by administrator-only operations, and
//! Argon2 password hashing.

pub mod error;
pub mod guard;
pub mod identity;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use guard::{extract_bearer_token, require_role};
pub use identity::{Authenticator, Identity};
pub use jwt::{Claims, TokenCodec, TokenConfig};
pub use password::{Argon2Hasher, CredentialHasher, hash_password, verify_password};
