use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, ErrorScope, ScopedError};
use crate::AppState;

/// Header carrying the session token
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Session gate for protected routes.
///
/// Resolves the token to its live account and hands the [`Account`] to the
/// wrapped handler through the request extensions. Handlers behind it take
/// `Extension<Account>`.
///
/// [`Account`]: crate::account::Account
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ScopedError> {
    let token = match request.headers().get(ACCESS_TOKEN_HEADER) {
        None => return Err(AppError::MissingToken.in_scope(ErrorScope::Session)),
        Some(value) => value
            .to_str()
            .map(|token| token.trim().to_string())
            .map_err(|_| {
                AppError::AuthFailed("token header is not visible ASCII".to_string())
                    .in_scope(ErrorScope::Session)
            })?,
    };
    if token.is_empty() {
        return Err(AppError::MissingToken.in_scope(ErrorScope::Session));
    }

    let account = state
        .auth
        .verify_session(&token)
        .await
        .map_err(|e| e.in_scope(ErrorScope::Session))?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}
