//! Password hashing and verification.
//!
//! Passwords are hashed with Argon2id and stored in PHC string format
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<digest>`), so the salt and the
//! algorithm parameters travel inside the stored value.
//!
//! # Example
//!
//! ```
//! use warden_auth::password::{hash_password, verify_password};
//!
//! let hash = hash_password("hunter2").unwrap();
//! assert!(verify_password("hunter2", &hash).unwrap());
//! assert!(!verify_password("hunter3", &hash).unwrap());
//! ```

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use serde::{Deserialize, Serialize};

/// Errors raised by the credential hasher.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The stored value is not a hash this hasher can interpret.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    /// Hashing itself failed (parameter or salt error).
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// A salted password hash in PHC string format.
///
/// Stored hashes are compared against, never decoded. The `Debug` output
/// hides the digest.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredHash(String);

impl StoredHash {
    /// Wraps a PHC string read from storage.
    ///
    /// No validation happens here; a foreign format surfaces as
    /// [`PasswordError::MalformedHash`] on verification.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Returns the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredHash(..)")
    }
}

/// Hash a password for storage using Argon2id.
///
/// A fresh salt is drawn from `OsRng` on every call, so hashing the same
/// password twice yields two different values.
///
/// # Errors
///
/// Returns [`PasswordError::Hashing`] if Argon2 rejects its inputs (rare).
pub fn hash_password(password: &str) -> Result<StoredHash, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(StoredHash(hash.to_string()))
}

/// Verify a password against a stored hash.
///
/// The digest is recomputed with the salt and parameters embedded in `hash`
/// and compared in constant time.
///
/// # Returns
///
/// `Ok(true)` on a match and `Ok(false)` on a mismatch.
///
/// # Errors
///
/// Returns [`PasswordError::MalformedHash`] when `hash` is not a PHC string,
/// names an algorithm other than Argon2, or lacks a salt or digest.
pub fn verify_password(password: &str, hash: &StoredHash) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(hash.as_str()).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(PasswordError::MalformedHash(
            "hash is missing its salt or digest".to_string(),
        ));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
    }
}
