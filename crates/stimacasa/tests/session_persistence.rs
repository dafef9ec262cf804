//! Login against the fake backend, then the identity's life in file-backed storage.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;

use common::{client, spawn_backend};
use stimacasa::session::{
    authenticate, AccessDenied, AuthError, FileStorage, Role, SessionGate, SessionStorage,
    IDENTITY_KEY,
};

async fn login_backend() -> String {
    let router = Router::new().route(
        "/api/auth/login",
        post(|Json(body): Json<Value>| async move {
            match (body["email"].as_str(), body["password"].as_str()) {
                (Some("anna.neri@example.it"), Some("corretta")) => Json(json!({
                    "username": "a.neri",
                    "roles": ["ROLE_AGENT"],
                    "success": true
                }))
                .into_response(),
                (Some("anna.neri@example.it"), Some(_)) => Json(json!({
                    "success": false,
                    "message": "Password errata"
                }))
                .into_response(),
                _ => (StatusCode::UNAUTHORIZED, "Bad credentials").into_response(),
            }
        }),
    );
    spawn_backend(router).await
}

#[tokio::test]
async fn authenticated_identity_survives_a_restart() {
    let api = client(&login_backend().await);
    let dir = tempdir().expect("tempdir");

    let identity = authenticate(&api, " anna.neri@example.it ", "corretta")
        .await
        .expect("login accepted");
    assert_eq!(identity.id, "a.neri");
    assert_eq!(identity.email, "anna.neri@example.it");
    assert_eq!(identity.role, Some(Role::Agent));

    let mut gate = SessionGate::init(FileStorage::new(dir.path())).expect("init");
    assert_eq!(gate.current(), None);
    gate.login(identity.clone()).expect("persist");
    assert!(dir.path().join("user.json").exists());

    let restarted = SessionGate::init(FileStorage::new(dir.path())).expect("init");
    assert_eq!(restarted.current(), Some(&identity));
    assert_eq!(restarted.authorize(Role::Agent).map(|i| i.id.as_str()), Ok("a.neri"));
    assert_eq!(
        restarted.authorize(Role::Admin),
        Err(AccessDenied {
            required: Role::Admin
        })
    );
}

#[tokio::test]
async fn logout_removes_the_persisted_identity() {
    let api = client(&login_backend().await);
    let dir = tempdir().expect("tempdir");
    let identity = authenticate(&api, "anna.neri@example.it", "corretta")
        .await
        .expect("login accepted");

    let mut gate = SessionGate::init(FileStorage::new(dir.path())).expect("init");
    gate.login(identity).expect("persist");
    gate.logout().expect("logout");

    assert!(!dir.path().join("user.json").exists());
    assert_eq!(gate.storage().get(IDENTITY_KEY).expect("read"), None);
    let restarted = SessionGate::init(FileStorage::new(dir.path())).expect("init");
    assert_eq!(restarted.current(), None);
}

#[tokio::test]
async fn rejected_logins_never_reach_storage() {
    let api = client(&login_backend().await);
    let dir = tempdir().expect("tempdir");
    let gate = SessionGate::init(FileStorage::new(dir.path())).expect("init");

    match authenticate(&api, "anna.neri@example.it", "sbagliata").await {
        Err(AuthError::InvalidCredentials(message)) => assert_eq!(message, "Password errata"),
        other => panic!("expected rejected login, got {other:?}"),
    }
    match authenticate(&api, "ignoto@example.it", "x").await {
        Err(AuthError::InvalidCredentials(message)) => assert_eq!(message, "Bad credentials"),
        other => panic!("expected unauthorized, got {other:?}"),
    }

    assert_eq!(gate.current(), None);
    assert!(!dir.path().join("user.json").exists());
}

#[test]
fn corrupt_identity_file_is_discarded_on_startup() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join("user.json"), "not json").expect("seed");

    let gate = SessionGate::init(FileStorage::new(dir.path())).expect("init");

    assert_eq!(gate.current(), None);
    assert!(!dir.path().join("user.json").exists());
}

#[test]
fn identity_file_with_invalid_utf8_is_discarded_on_startup() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join("user.json"), [0xff, 0xfe, 0x00]).expect("seed");

    let mut gate = SessionGate::init(FileStorage::new(dir.path())).expect("init");

    assert_eq!(gate.current(), None);
    assert!(!dir.path().join("user.json").exists());
    gate.logout().expect("logout still works");
}
