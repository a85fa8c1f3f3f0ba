//! # warden-auth
//!
//! Pluggable request authentication for the Warden API server.
//!
//! This crate provides:
//! - An [`AuthScheme`] contract with path exclusion and header extraction
//! - HTTP Basic authentication against a [`UserLookup`] collaborator
//! - Argon2id password hashing and verification
//! - An axum middleware that guards routes with the configured scheme
//!
//! ## Modules
//!
//! - [`scheme`] - The scheme contract and path-exclusion matching
//! - [`basic`] - HTTP Basic authentication
//! - [`password`] - Credential hashing
//! - [`storage`] - User lookup contract and in-memory store
//! - [`config`] - Scheme selection from configuration
//! - [`middleware`] - Axum request guard
//!
//! Rejections never leak why authentication failed: every failure of a
//! scheme is the same absent user. [`AuthError`] variants exist only for
//! diagnostics.

pub mod basic;
pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod scheme;
pub mod storage;
pub mod types;

pub use basic::BasicAuth;
pub use config::{AuthConfig, AuthSchemeKind};
pub use error::{AuthError, ErrorCategory};
pub use middleware::{AuthGuard, AuthRejection, CurrentUser, require_authentication};
pub use password::{PasswordError, StoredHash, hash_password, verify_password};
pub use scheme::{AuthScheme, HeaderSource, NullAuth, require_auth};
pub use storage::{InMemoryUserStore, UserLookup};
pub use types::{Credential, User, UserRecord};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
