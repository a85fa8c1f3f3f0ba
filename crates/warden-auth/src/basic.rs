//! HTTP Basic authentication scheme.
//!
//! Resolves a user from an `Authorization: Basic <base64(username:password)>`
//! header. Resolution stops at the first failing step:
//!
//! 1. the header is present,
//! 2. it starts with `Basic ` (case-sensitive, one space),
//! 3. the payload is valid base64,
//! 4. the decoded bytes are valid UTF-8,
//! 5. the text splits on its first `:` into username and password,
//! 6. the user store knows the username,
//! 7. the password verifies against the stored hash.
//!
//! [`BasicAuth::authenticate`] reports which step failed. Through the
//! [`AuthScheme`] contract every failure is the same absent user.

use std::sync::{Arc, OnceLock};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::AuthResult;
use crate::error::AuthError;
use crate::password::{StoredHash, hash_password, verify_password};
use crate::scheme::{AuthScheme, HeaderSource};
use crate::storage::UserLookup;
use crate::types::{Credential, User};

/// Scheme prefix of a Basic `Authorization` header.
pub const BASIC_PREFIX: &str = "Basic ";

/// Basic authentication backed by a [`UserLookup`].
#[derive(Clone)]
pub struct BasicAuth {
    users: Arc<dyn UserLookup>,
}

impl BasicAuth {
    /// Creates a scheme resolving credentials through `users`.
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        Self { users }
    }

    /// Resolves the request's user, reporting why resolution failed.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] of the first failing step.
    pub fn authenticate(&self, request: Option<&dyn HeaderSource>) -> AuthResult<User> {
        let header = self
            .authorization_header(request)
            .ok_or(AuthError::MissingHeader)?;
        let encoded = extract_base64_credentials(header)?;
        let decoded = decode_base64_credentials(encoded)?;
        let credential = split_credentials(&decoded)?;
        self.user_from_credentials(&credential)
    }

    /// Looks up the user for `credential` and verifies its password.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyCredentials`] if either part is empty
    /// - [`AuthError::UserNotFound`] if the store has no such user
    /// - [`AuthError::VerificationFailed`] if the password does not match
    /// - [`AuthError::Storage`] or [`AuthError::Password`] on store or hash problems
    pub fn user_from_credentials(&self, credential: &Credential) -> AuthResult<User> {
        if credential.username.is_empty() || credential.password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }

        let Some(record) = self
            .users
            .find_by_credential_username(&credential.username)?
        else {
            // Spend the same hashing work as a real verification.
            if let Some(dummy) = dummy_hash() {
                let _ = verify_password(&credential.password, dummy);
            }
            return Err(AuthError::UserNotFound);
        };

        if verify_password(&credential.password, &record.password_hash)? {
            Ok(record.user)
        } else {
            Err(AuthError::VerificationFailed)
        }
    }
}

impl AuthScheme for BasicAuth {
    fn name(&self) -> &'static str {
        "basic_auth"
    }

    fn current_user(&self, request: Option<&dyn HeaderSource>) -> Option<User> {
        match self.authenticate(request) {
            Ok(user) => Some(user),
            Err(e) if e.is_server_error() => {
                tracing::warn!(
                    reason = e.kind(),
                    category = %e.category(),
                    error = %e,
                    "Basic authentication failed on the server side"
                );
                None
            }
            Err(e) => {
                tracing::debug!(
                    reason = e.kind(),
                    category = %e.category(),
                    "Basic authentication rejected"
                );
                None
            }
        }
    }
}

/// Returns the base64 payload of a Basic `Authorization` header.
///
/// # Errors
///
/// Returns [`AuthError::MalformedCredentialHeader`] if the header does not
/// start with `Basic `.
pub fn extract_base64_credentials(header: &str) -> AuthResult<&str> {
    header
        .strip_prefix(BASIC_PREFIX)
        .ok_or_else(|| AuthError::malformed_header("Authorization header must start with 'Basic '"))
}

/// Decodes a base64 credential payload into UTF-8 text.
///
/// # Errors
///
/// Returns [`AuthError::InvalidEncoding`] on invalid base64 (alphabet or
/// padding) or on invalid UTF-8.
pub fn decode_base64_credentials(encoded: &str) -> AuthResult<String> {
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::invalid_encoding(format!("invalid base64: {e}")))?;

    String::from_utf8(decoded)
        .map_err(|_| AuthError::invalid_encoding("decoded credentials are not valid UTF-8"))
}

/// Splits decoded credentials on the first `:`.
///
/// The password may itself contain `:`.
///
/// # Errors
///
/// Returns [`AuthError::MissingSeparator`] if there is no `:`.
pub fn split_credentials(decoded: &str) -> AuthResult<Credential> {
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MissingSeparator)?;

    Ok(Credential {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn dummy_hash() -> Option<&'static StoredHash> {
    static DUMMY: OnceLock<Option<StoredHash>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("warden-dummy-password").ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use crate::storage::InMemoryUserStore;
    use crate::types::UserRecord;
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic_header(raw: &str) -> HeaderMap {
        headers(&format!("Basic {}", STANDARD.encode(raw)))
    }

    fn scheme_with(email: &str, password: &str) -> BasicAuth {
        let record = UserRecord::new(User::new(email), hash_password(password).unwrap());
        BasicAuth::new(Arc::new(InMemoryUserStore::new().with_user(record)))
    }

    #[test]
    fn test_extract_base64_credentials() {
        assert_eq!(extract_base64_credentials("Basic abc=").unwrap(), "abc=");
        assert_eq!(extract_base64_credentials("Basic ").unwrap(), "");
        assert!(matches!(
            extract_base64_credentials("Bearer xyz"),
            Err(AuthError::MalformedCredentialHeader { .. })
        ));
        assert!(extract_base64_credentials("basic abc").is_err());
        assert!(extract_base64_credentials("Basicabc").is_err());
    }

    #[test]
    fn test_decode_base64_credentials() {
        assert_eq!(decode_base64_credentials("dXNlcjpwYXNz").unwrap(), "user:pass");
        assert!(matches!(
            decode_base64_credentials("!!!invalid!!!"),
            Err(AuthError::InvalidEncoding { .. })
        ));
        // Missing padding.
        assert!(decode_base64_credentials("dXNlcjpwYXM").is_err());
        // 0xFF 0xFE is not UTF-8.
        assert!(matches!(
            decode_base64_credentials(&STANDARD.encode([0xFF, 0xFE])),
            Err(AuthError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_split_credentials_on_first_colon() {
        let credential = split_credentials("bob@example.com:pa:ss:word").unwrap();
        assert_eq!(credential.username, "bob@example.com");
        assert_eq!(credential.password, "pa:ss:word");

        assert!(matches!(
            split_credentials("no-colon-here"),
            Err(AuthError::MissingSeparator)
        ));
    }

    #[test]
    fn test_resolves_user_with_valid_credentials() {
        let scheme = scheme_with("user", "pass");
        let headers = headers("Basic dXNlcjpwYXNz");

        let user = scheme.current_user(Some(&headers)).expect("user resolved");
        assert_eq!(user.email, "user");
    }

    #[test]
    fn test_password_containing_colon() {
        let scheme = scheme_with("bob@example.com", "a:b");
        let user = scheme.authenticate(Some(&basic_header("bob@example.com:a:b")));
        assert_eq!(user.unwrap().email, "bob@example.com");
    }

    #[test]
    fn test_failure_reasons() {
        let scheme = scheme_with("user", "pass");

        assert!(matches!(scheme.authenticate(None), Err(AuthError::MissingHeader)));
        assert!(matches!(
            scheme.authenticate(Some(&headers("Bearer xyz"))),
            Err(AuthError::MalformedCredentialHeader { .. })
        ));
        assert!(matches!(
            scheme.authenticate(Some(&headers("Basic @@@"))),
            Err(AuthError::InvalidEncoding { .. })
        ));
        assert!(matches!(
            scheme.authenticate(Some(&basic_header("userpass"))),
            Err(AuthError::MissingSeparator)
        ));
        assert!(matches!(
            scheme.authenticate(Some(&basic_header("user:"))),
            Err(AuthError::EmptyCredentials)
        ));
        assert!(matches!(
            scheme.authenticate(Some(&basic_header("nobody:pass"))),
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            scheme.authenticate(Some(&basic_header("user:wrong"))),
            Err(AuthError::VerificationFailed)
        ));
    }

    #[test]
    fn test_every_failure_is_absent_user() {
        let scheme = scheme_with("user", "pass");

        for value in [
            "Bearer xyz",
            "Basic @@@",
            "Basic dXNlcnBhc3M=",
            "Basic bm9ib2R5OnBhc3M=",
            "Basic dXNlcjp3cm9uZw==",
        ] {
            assert!(scheme.current_user(Some(&headers(value))).is_none(), "{value}");
        }
        assert!(scheme.current_user(None).is_none());
    }

    #[test]
    fn test_malformed_stored_hash_is_absent_user() {
        let record = UserRecord::new(User::new("user"), StoredHash::from_phc("$2b$12$foreign"));
        let scheme = BasicAuth::new(Arc::new(InMemoryUserStore::new().with_user(record)));
        let headers = headers("Basic dXNlcjpwYXNz");

        assert!(matches!(
            scheme.authenticate(Some(&headers)),
            Err(AuthError::Password(_))
        ));
        assert!(scheme.current_user(Some(&headers)).is_none());
    }
}
