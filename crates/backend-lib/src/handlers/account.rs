//! `GET /v1/account`, behind the session gate
use accountgate_common::AccountView;
use axum::{Extension, Json};

use crate::account::Account;

pub async fn current_account(Extension(account): Extension<Account>) -> Json<AccountView> {
    Json(account.view())
}
