use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use warden_auth::{AuthSchemeKind, InMemoryUserStore, User, UserRecord, hash_password};
use warden_server::{AppConfig, build_app};

// "bob@dylan.com:H0lbertonSchool98!"
const BOB: &str = "Basic Ym9iQGR5bGFuLmNvbTpIMGxiZXJ0b25TY2hvb2w5OCE=";

fn app(scheme: AuthSchemeKind) -> Router {
    let mut cfg = AppConfig::default();
    cfg.auth.scheme = scheme;

    let record = UserRecord::new(
        User::new("bob@dylan.com").with_name(Some("Bob"), Some("Dylan")),
        hash_password("H0lbertonSchool98!").unwrap(),
    );
    build_app(&cfg, Arc::new(InMemoryUserStore::new().with_user(record)))
}

async fn get(app: Router, path: &str, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(path);
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn status_is_public_with_or_without_slash() {
    for path in ["/api/v1/status", "/api/v1/status/"] {
        let (status, body) = get(app(AuthSchemeKind::Basic), path, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body, json!({ "status": "OK" }));
    }
}

#[tokio::test]
async fn error_endpoints_answer_with_their_status() {
    let (status, body) = get(app(AuthSchemeKind::Basic), "/api/v1/unauthorized", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, body) = get(app(AuthSchemeKind::Basic), "/api/v1/forbidden/", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));
}

#[tokio::test]
async fn users_me_requires_a_header() {
    let (status, body) = get(app(AuthSchemeKind::Basic), "/api/v1/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn users_me_returns_the_authenticated_user() {
    let (status, body) = get(app(AuthSchemeKind::Basic), "/api/v1/users/me", Some(BOB)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bob@dylan.com");
    assert_eq!(body["first_name"], "Bob");
    assert_eq!(body["last_name"], "Dylan");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_is_forbidden() {
    // "bob@dylan.com:wrong"
    let header = "Basic Ym9iQGR5bGFuLmNvbTp3cm9uZw==";
    let (status, _) = get(app(AuthSchemeKind::Basic), "/api/v1/users/me", Some(header)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn null_scheme_forbids_guarded_routes() {
    let (status, _) = get(app(AuthSchemeKind::None), "/api/v1/users/me", Some(BOB)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(app(AuthSchemeKind::None), "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found_once_authenticated() {
    let (status, body) = get(app(AuthSchemeKind::Basic), "/api/v1/nope", Some(BOB)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));

    let (status, _) = get(app(AuthSchemeKind::Basic), "/api/v1/nope", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
