mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use accountgate_backend_lib::account::Account;
use accountgate_backend_lib::auth::{verify_password, ResetClaims, TokenCodec};
use accountgate_backend_lib::store::FlatFileStore;
use axum::http::StatusCode;
use serde_json::json;
use tempfile::tempdir;
use test_utils::*;

const RESET_PATH: &str = "/v1/auth/reset-password";

async fn session_token(app: &TestApp, identifier: &str, password: &str) -> String {
    let reply = login(&app.router, identifier, password).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    reply.json()["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_reset_flow_end_to_end() {
    let app = memory_app();
    let alice = user("alice", true);
    app.store.insert(alice.clone()).await.unwrap();
    let old_session = session_token(&app, "alice", PASSWORD).await;

    let reset = app.state.auth.issue_reset_token("alice@example.com").await.unwrap();
    let reply = post_json(
        &app.router,
        RESET_PATH,
        json!({ "password": "new password", "token": reset }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({ "message": "ok" }));

    // stored token cleared, key rotated, hash replaced
    let stored = app.store.find_by_id(alice.id()).await.unwrap();
    assert!(stored.credentials().password_reset_token.is_empty());
    assert_ne!(stored.credentials().auth_key, alice.credentials().auth_key);
    assert!(verify_password(&stored.credentials().password_hash, "new password"));

    // sessions from before the reset are dead
    let reply = get_with_token(&app.router, "/v1/account", Some(&old_session)).await;
    assert_eq!(reply.code(), 3001);
    session_token(&app, "alice", "new password").await;

    // replaying the same reset token fails
    let reply = post_json(
        &app.router,
        RESET_PATH,
        json!({ "password": "another", "token": reset }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, r#"{"message":"Invalid reset token.","code":3201}"#);
}

#[tokio::test]
async fn test_superseded_reset_token_is_rejected() {
    let app = memory_app();
    app.store.insert(user("alice", true)).await.unwrap();

    let first = app.state.auth.issue_reset_token("alice@example.com").await.unwrap();
    // ensure the second token differs even within the same second
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let second = app.state.auth.issue_reset_token("alice@example.com").await.unwrap();
    assert_ne!(first, second);

    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x", "token": first })).await;
    assert_eq!(reply.code(), 3201);

    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x", "token": second })).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_signed_but_never_issued_token() {
    let app = memory_app();
    let alice = user("alice", true);
    app.store.insert(alice.clone()).await.unwrap();

    // validly signed for alice, but no reset is pending
    let codec = TokenCodec::new(&app.state.settings.jwt_secret).unwrap();
    let token = codec
        .issue(&ResetClaims { id: alice.id().to_string() }, Duration::from_secs(60))
        .unwrap();
    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x", "token": token })).await;
    assert_eq!(reply.code(), 3201);
}

#[tokio::test]
async fn test_unknown_subject_maps_to_not_found() {
    let app = memory_app();
    let codec = TokenCodec::new(&app.state.settings.jwt_secret).unwrap();
    let token = codec
        .issue(&ResetClaims { id: "ghost@example.com".to_string() }, Duration::from_secs(60))
        .unwrap();

    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x", "token": token })).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, r#"{"message":"Not Found (Account not found.)","code":3202}"#);
}

#[tokio::test]
async fn test_bad_reset_tokens() {
    let app = memory_app();
    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x", "token": "junk" })).await;
    assert_eq!(reply.code(), 3201);

    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "x" })).await;
    assert_eq!(reply.code(), 4050);

    let reply = post_form(&app.router, RESET_PATH, "token=abc").await;
    assert_eq!(reply.code(), 4050);
}

#[tokio::test]
async fn test_reset_organization_on_disk() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FlatFileStore::new(dir.path()).unwrap());
    let app = app_with_store(store);
    let acme = organization("acme");
    app.store.insert(acme.clone()).await.unwrap();

    let reset = app.state.auth.issue_reset_token(acme.id()).await.unwrap();
    let reply = post_form(
        &app.router,
        RESET_PATH,
        &format!("password=hunter2&token={reset}"),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);

    let path = dir
        .path()
        .join("organizations")
        .join(format!("{}.json", acme.id()));
    let on_disk: Account = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    match on_disk {
        Account::Organization(org) => {
            assert_eq!(org.organization_name, "ACME");
            assert!(org.credentials.password_reset_token.is_empty());
            assert!(verify_password(&org.credentials.password_hash, "hunter2"));
        },
        other => panic!("expected an organization, got {other:?}"),
    }
    assert!(!dir.path().join("users").join(format!("{}.json", acme.id())).exists());
}

#[tokio::test]
async fn test_racing_resets_on_disk() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FlatFileStore::new(dir.path()).unwrap());
    let app = app_with_store(store);
    let alice = user("alice", true);
    app.store.insert(alice.clone()).await.unwrap();
    let reset = app.state.auth.issue_reset_token("alice").await.unwrap();

    let (first, second) = tokio::join!(
        post_json(&app.router, RESET_PATH, json!({ "password": "first", "token": reset })),
        post_json(&app.router, RESET_PATH, json!({ "password": "second", "token": reset })),
    );
    for reply in [&first, &second] {
        assert!(
            reply.status == StatusCode::OK || reply.code() == 3201,
            "unexpected reply {} {}",
            reply.status,
            reply.body
        );
    }
    assert!(first.status == StatusCode::OK || second.status == StatusCode::OK);

    // one of the two won, whole, and the token is spent
    let stored = app.store.find_by_id(alice.id()).await.unwrap();
    assert!(stored.credentials().password_reset_token.is_empty());
    let hash = &stored.credentials().password_hash;
    assert!(verify_password(hash, "first") || verify_password(hash, "second"));

    let reply = post_json(&app.router, RESET_PATH, json!({ "password": "third", "token": reset })).await;
    assert_eq!(reply.code(), 3201);
}
