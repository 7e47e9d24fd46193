//! `POST /v1/auth/login`
use std::sync::Arc;

use accountgate_common::{LoginForm, TokenResponse};
use axum::{extract::State, Json};

use crate::error::{AppError, ErrorScope, ScopedError};
use crate::validation::{Decoded, RequiredFields};
use crate::AppState;

/// Exchange an identifier and password for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Decoded(form): Decoded<LoginForm>,
) -> Result<Json<TokenResponse>, ScopedError> {
    let request = form
        .require()
        .map_err(|e| AppError::from(e).in_scope(ErrorScope::Login))?;

    let token = state
        .auth
        .login(&request.identifier, &request.password)
        .await
        .map_err(|e| e.in_scope(ErrorScope::Login))?;

    Ok(Json(TokenResponse { token }))
}
