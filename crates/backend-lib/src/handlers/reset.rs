//! `POST /v1/auth/reset-password`
use std::sync::Arc;

use accountgate_common::{MessageResponse, ResetPasswordForm};
use axum::{extract::State, Json};

use crate::error::{AppError, ErrorScope, ScopedError};
use crate::validation::{Decoded, RequiredFields};
use crate::AppState;

/// Set a new password using the token from the reset email.
///
/// Success rotates the account's auth key, so every session issued before
/// the reset stops working.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Decoded(form): Decoded<ResetPasswordForm>,
) -> Result<Json<MessageResponse>, ScopedError> {
    let request = form
        .require()
        .map_err(|e| AppError::from(e).in_scope(ErrorScope::Reset))?;

    state
        .auth
        .reset_password(&request.token, request.password)
        .await
        .map_err(|e| e.in_scope(ErrorScope::Reset))?;

    Ok(Json(MessageResponse::ok()))
}
