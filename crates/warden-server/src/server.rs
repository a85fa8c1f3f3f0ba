use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{MethodRouter, get},
};
use serde_json::{Value, json};
use warden_auth::{AuthGuard, AuthRejection, CurrentUser, User, UserLookup, require_authentication};

use crate::config::AppConfig;

/// Build the API router, guarded by the configured auth scheme.
///
/// Every route answers with and without a trailing slash.
pub fn build_app(cfg: &AppConfig, users: Arc<dyn UserLookup>) -> Router {
    let guard = AuthGuard::from_config(&cfg.auth, users);
    tracing::info!(
        scheme = guard.scheme().name(),
        excluded_paths = ?cfg.auth.excluded_paths,
        "Auth guard configured"
    );

    let router = Router::new();
    let router = route_with_slash(router, "/api/v1/status", get(status));
    let router = route_with_slash(router, "/api/v1/unauthorized", get(unauthorized));
    let router = route_with_slash(router, "/api/v1/forbidden", get(forbidden));
    let router = route_with_slash(router, "/api/v1/users/me", get(users_me));

    router
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(guard, require_authentication))
}

fn route_with_slash(router: Router, path: &str, method_router: MethodRouter) -> Router {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Bind and serve until Ctrl-C.
pub async fn run(cfg: &AppConfig, users: Arc<dyn UserLookup>) -> anyhow::Result<()> {
    let app = build_app(cfg, users);
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn unauthorized() -> AuthRejection {
    AuthRejection::Unauthorized
}

async fn forbidden() -> AuthRejection {
    AuthRejection::Forbidden
}

async fn users_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
