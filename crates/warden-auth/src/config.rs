//! Authentication configuration and scheme selection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::basic::BasicAuth;
use crate::scheme::{AuthScheme, NullAuth};
use crate::storage::UserLookup;

/// Which scheme authenticates requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum AuthSchemeKind {
    /// Never resolves a user; protected paths are always refused.
    #[default]
    #[serde(rename = "none", alias = "auth")]
    None,
    /// HTTP Basic credentials checked against the user store.
    #[serde(rename = "basic_auth", alias = "basic")]
    Basic,
}

/// Authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// scheme = "basic_auth"
/// excluded_paths = ["/api/v1/status/"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// The scheme to use.
    pub scheme: AuthSchemeKind,

    /// Paths served without authentication.
    ///
    /// Compared exactly after trailing-slash normalization; see
    /// [`crate::scheme::require_auth`].
    pub excluded_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scheme: AuthSchemeKind::default(),
            excluded_paths: vec![
                "/api/v1/status/".to_string(),
                "/api/v1/unauthorized/".to_string(),
                "/api/v1/forbidden/".to_string(),
            ],
        }
    }
}

impl AuthConfig {
    /// Builds the configured scheme.
    pub fn build_scheme(&self, users: Arc<dyn UserLookup>) -> Arc<dyn AuthScheme> {
        match self.scheme {
            AuthSchemeKind::None => Arc::new(NullAuth),
            AuthSchemeKind::Basic => Arc::new(BasicAuth::new(users)),
        }
    }
}
