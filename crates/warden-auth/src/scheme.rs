//! The contract every authentication scheme satisfies.
//!
//! A scheme decides three things for a request:
//!
//! 1. whether its path needs authentication at all ([`AuthScheme::require_auth`]),
//! 2. what the raw `Authorization` header says ([`AuthScheme::authorization_header`]),
//! 3. which user, if any, the request belongs to ([`AuthScheme::current_user`]).
//!
//! Schemes only need to read named headers, so requests are seen through the
//! small [`HeaderSource`] view rather than a concrete HTTP type.

use axum::http::{HeaderMap, Request, header::AUTHORIZATION, request::Parts};

use crate::types::User;

// =============================================================================
// Request view
// =============================================================================

/// Read access to the headers of an inbound request.
pub trait HeaderSource {
    /// Returns the value of header `name`, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl<B> HeaderSource for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().header(name)
    }
}

impl HeaderSource for Parts {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.header(name)
    }
}

// =============================================================================
// Path exclusion
// =============================================================================

/// Returns `false` only if `path` is one of `excluded_paths`.
///
/// Both sides are compared after appending a trailing `/` when missing, so
/// `/api/v1/status` matches an entry `/api/v1/status/` and vice versa.
/// Matching is exact after that normalization: there is no prefix or glob
/// matching, and `/api/v1/status/extra` is not excluded by `/api/v1/status/`.
///
/// A missing or empty `path`, or an empty exclusion list, always requires
/// authentication.
#[must_use]
pub fn require_auth<P: AsRef<str>>(path: Option<&str>, excluded_paths: &[P]) -> bool {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return true;
    };
    if excluded_paths.is_empty() {
        return true;
    }

    let path = with_trailing_slash(path);
    !excluded_paths
        .iter()
        .any(|excluded| with_trailing_slash(excluded.as_ref()) == path)
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

// =============================================================================
// Scheme contract
// =============================================================================

/// An authentication scheme.
///
/// The provided methods implement the base behavior: path exclusion by
/// [`require_auth`], header extraction, and no user resolution. Concrete
/// schemes override [`AuthScheme::current_user`].
pub trait AuthScheme: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if `path` needs authentication under this scheme.
    fn require_auth(&self, path: Option<&str>, excluded_paths: &[String]) -> bool {
        require_auth(path, excluded_paths)
    }

    /// Returns the raw value of the request's `Authorization` header.
    fn authorization_header<'r>(&self, request: Option<&'r dyn HeaderSource>) -> Option<&'r str> {
        request?.header(AUTHORIZATION.as_str())
    }

    /// Resolves the user making the request.
    fn current_user(&self, _request: Option<&dyn HeaderSource>) -> Option<User> {
        None
    }
}

/// The base scheme: honors path exclusion but never resolves a user.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuth;

impl AuthScheme for NullAuth {
    fn name(&self) -> &'static str {
        "none"
    }
}
