//! Axum request guard.
//!
//! [`require_authentication`] runs the configured scheme in front of every
//! route:
//!
//! - paths excluded by configuration pass through untouched,
//! - a request without an `Authorization` header gets `401`,
//! - a request whose credentials resolve no user gets `403`,
//! - otherwise the user is stored in request extensions and handlers can
//!   take it with the [`CurrentUser`] extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use warden_auth::middleware::{AuthGuard, CurrentUser, require_authentication};
//!
//! async fn me(CurrentUser(user): CurrentUser) -> String {
//!     user.display_name()
//! }
//!
//! let app = Router::new()
//!     .route("/api/v1/users/me", get(me))
//!     .layer(middleware::from_fn_with_state(guard, require_authentication));
//! ```

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::config::AuthConfig;
use crate::scheme::{AuthScheme, HeaderSource};
use crate::storage::UserLookup;
use crate::types::User;

/// State for [`require_authentication`].
#[derive(Clone)]
pub struct AuthGuard {
    scheme: Arc<dyn AuthScheme>,
    excluded_paths: Arc<[String]>,
}

impl AuthGuard {
    /// Creates a guard around `scheme`.
    pub fn new(scheme: Arc<dyn AuthScheme>, excluded_paths: Vec<String>) -> Self {
        Self {
            scheme,
            excluded_paths: excluded_paths.into(),
        }
    }

    /// Creates a guard for the scheme and exclusions named in `config`.
    pub fn from_config(config: &AuthConfig, users: Arc<dyn UserLookup>) -> Self {
        Self::new(config.build_scheme(users), config.excluded_paths.clone())
    }

    /// The guarded scheme.
    pub fn scheme(&self) -> &dyn AuthScheme {
        self.scheme.as_ref()
    }
}

/// The user resolved for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Rejection returned by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No credentials were presented.
    Unauthorized,
    /// Credentials were presented but resolved no user.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
        };
        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Authentication middleware; see the module documentation.
pub async fn require_authentication(
    State(guard): State<AuthGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !guard.scheme.require_auth(Some(&path), &guard.excluded_paths) {
        return next.run(req).await;
    }

    // None: no header. Some(None): header present, no user resolved.
    let resolved = {
        let headers: &dyn HeaderSource = req.headers();
        guard
            .scheme
            .authorization_header(Some(headers))
            .map(|_| guard.scheme.current_user(Some(headers)))
    };

    match resolved {
        None => {
            tracing::debug!(path = %path, scheme = guard.scheme.name(), "No Authorization header");
            AuthRejection::Unauthorized.into_response()
        }
        Some(Some(user)) => {
            tracing::debug!(
                user_id = %user.id,
                path = %path,
                scheme = guard.scheme.name(),
                "Request authenticated"
            );
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Some(None) => {
            tracing::debug!(path = %path, scheme = guard.scheme.name(), "Credentials rejected");
            AuthRejection::Forbidden.into_response()
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)
    }
}
