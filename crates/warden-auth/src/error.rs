//! Authentication error types.
//!
//! These errors describe *why* a credential was rejected. They exist for
//! internal diagnostics only: schemes collapse every variant into an absent
//! user before anything crosses the auth boundary.

use std::fmt;

use crate::password::PasswordError;

/// Errors that can occur while resolving an identity from a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carries no `Authorization` header.
    #[error("Missing Authorization header")]
    MissingHeader,

    /// The header does not use the expected scheme prefix.
    #[error("Malformed credential header: {message}")]
    MalformedCredentialHeader {
        /// Description of what was wrong with the header.
        message: String,
    },

    /// The credential payload is not valid base64 or not valid UTF-8.
    #[error("Invalid encoding: {message}")]
    InvalidEncoding {
        /// Description of the decoding failure.
        message: String,
    },

    /// The decoded credentials contain no `:` separator.
    #[error("Credentials must be in format 'username:password'")]
    MissingSeparator,

    /// The username or password is empty.
    #[error("Empty username or password")]
    EmptyCredentials,

    /// No user exists for the supplied username.
    #[error("User not found")]
    UserNotFound,

    /// The supplied password does not match the stored hash.
    #[error("Credential verification failed")]
    VerificationFailed,

    /// The user-lookup collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The stored hash could not be used for verification.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AuthError {
    /// Creates a new `MalformedCredentialHeader` error.
    #[must_use]
    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::MalformedCredentialHeader {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidEncoding` error.
    #[must_use]
    pub fn invalid_encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns a stable identifier for this error, for diagnostic logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedCredentialHeader { .. } => "malformed_credential_header",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::MissingSeparator => "missing_separator",
            Self::EmptyCredentials => "empty_credentials",
            Self::UserNotFound => "user_not_found",
            Self::VerificationFailed => "verification_failed",
            Self::Storage { .. } => "storage",
            Self::Password(PasswordError::MalformedHash(_)) => "malformed_hash",
            Self::Password(PasswordError::Hashing(_)) => "hashing",
        }
    }

    /// Returns `true` if the failure points at server-side misconfiguration
    /// rather than at the client's credentials.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Password(_))
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingHeader | Self::MalformedCredentialHeader { .. } => ErrorCategory::Header,
            Self::InvalidEncoding { .. } | Self::MissingSeparator | Self::EmptyCredentials => {
                ErrorCategory::Credentials
            }
            Self::UserNotFound | Self::VerificationFailed => ErrorCategory::Identity,
            Self::Storage { .. } | Self::Password(_) => ErrorCategory::Infrastructure,
        }
    }
}

/// Categories of authentication errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The header is absent or uses another scheme.
    Header,
    /// The credential payload could not be decoded or split.
    Credentials,
    /// The credentials do not match a known identity.
    Identity,
    /// The user store or the stored hash is broken.
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Credentials => write!(f, "credentials"),
            Self::Identity => write!(f, "identity"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::malformed_header("expected 'Basic '");
        assert_eq!(err.to_string(), "Malformed credential header: expected 'Basic '");

        let err = AuthError::invalid_encoding("bad padding");
        assert_eq!(err.to_string(), "Invalid encoding: bad padding");

        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
    }

    #[test]
    fn test_kind_and_category() {
        assert_eq!(AuthError::MissingSeparator.kind(), "missing_separator");
        assert_eq!(AuthError::MissingSeparator.category(), ErrorCategory::Credentials);
        assert_eq!(AuthError::VerificationFailed.category(), ErrorCategory::Identity);

        let err = AuthError::from(PasswordError::MalformedHash("x".into()));
        assert_eq!(err.kind(), "malformed_hash");
        assert!(err.is_server_error());
        assert!(!AuthError::UserNotFound.is_server_error());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
