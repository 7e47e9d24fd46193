// ============================
// accountgate-backend-lib/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{account, login, reset};
use crate::middleware::require_session;
use crate::AppState;

pub const LOGIN_PATH: &str = "/v1/auth/login";
pub const RESET_PASSWORD_PATH: &str = "/v1/auth/reset-password";
pub const ACCOUNT_PATH: &str = "/v1/account";

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything in here goes through the session gate
    let protected = Router::new()
        .route(ACCOUNT_PATH, get(account::current_account))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route(LOGIN_PATH, post(login::login))
        .route(RESET_PASSWORD_PATH, post(reset::reset_password))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
