//! Shared helpers for router-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use accountgate_backend_lib::{
    account::{Account, Credentials, OrganizationAccount, UserAccount},
    auth::{hash_password, HashCost},
    config::{Settings, StoreKind},
    router::create_router,
    store::{AccountStore, MemoryStore},
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

pub use accountgate_backend_lib::auth::AuthService;
pub use accountgate_backend_lib::store::AccountStore as _;

pub const PASSWORD: &str = "correct";

/// Cheap enough to keep tests fast
pub const TEST_COST: HashCost = HashCost { log_n: 4, r: 8, p: 1 };

pub fn test_settings() -> Settings {
    Settings {
        jwt_secret: "router-test-secret".to_string(),
        hash_cost: TEST_COST,
        store: StoreKind::Memory,
        ..Settings::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<dyn AccountStore>,
}

pub fn app_with_store(store: Arc<dyn AccountStore>) -> TestApp {
    let state = Arc::new(AppState::new(store.clone(), test_settings()).unwrap());
    TestApp {
        router: create_router(state.clone()),
        state,
        store,
    }
}

pub fn memory_app() -> TestApp {
    app_with_store(Arc::new(MemoryStore::new()))
}

pub fn user(username: &str, verified: bool) -> Account {
    let mut credentials = Credentials::new(
        username,
        format!("{username}@example.com"),
        hash_password(PASSWORD, &TEST_COST).unwrap(),
    );
    credentials.is_email_verified = verified;
    UserAccount {
        credentials,
        first_name: None,
        last_name: None,
    }
    .into()
}

pub fn organization(username: &str) -> Account {
    let mut credentials = Credentials::new(
        username,
        format!("ops@{username}.test"),
        hash_password(PASSWORD, &TEST_COST).unwrap(),
    );
    credentials.is_email_verified = true;
    OrganizationAccount {
        credentials,
        organization_name: username.to_uppercase(),
        is_organization_verified: false,
    }
    .into()
}

pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn code(&self) -> u64 {
        self.json()["code"].as_u64().unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn post_json(router: &Router, path: &str, body: serde_json::Value) -> Reply {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

pub async fn post_form(router: &Router, path: &str, body: &str) -> Reply {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

pub async fn get_with_token(router: &Router, path: &str, token: Option<&str>) -> Reply {
    let mut request = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        request = request.header("x-access-token", token);
    }
    send(router, request.body(Body::empty()).unwrap()).await
}

pub async fn login(router: &Router, identifier: &str, password: &str) -> Reply {
    post_json(
        router,
        "/v1/auth/login",
        serde_json::json!({ "username": identifier, "password": password }),
    )
    .await
}
