//! Identity and credential types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::password::StoredHash;

// =============================================================================
// User
// =============================================================================

/// An authenticated identity.
///
/// Basic-auth usernames are user emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: String,

    /// Email address, also the credential username.
    pub email: String,

    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    /// Creates a new user with a random UUID as its ID.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// Sets the given and family names.
    #[must_use]
    pub fn with_name(
        mut self,
        first_name: Option<impl Into<String>>,
        last_name: Option<impl Into<String>>,
    ) -> Self {
        self.first_name = first_name.map(Into::into);
        self.last_name = last_name.map(Into::into);
        self
    }

    /// Name for display: full name, else whichever name part exists,
    /// else the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

/// A user together with the hash of its password, as held by a user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// The user.
    #[serde(flatten)]
    pub user: User,

    /// Hash of the user's password.
    pub password_hash: StoredHash,
}

impl UserRecord {
    /// Pairs a user with its stored hash.
    #[must_use]
    pub fn new(user: User, password_hash: StoredHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }
}

// =============================================================================
// Credential
// =============================================================================

/// A username/password pair extracted from a single request.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// The claimed username.
    pub username: String,
    /// The plaintext password.
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
