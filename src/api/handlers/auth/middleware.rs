//! Request-authorization pipeline.
//!
//! Ordered stages gate every protected route: `deserialize_user` resolves the
//! presented token into a `CurrentUser` request extension, `require_user`
//! gates on its presence, and `require_verified` adds the per-route
//! email-verification policy. Each stage short-circuits with a terminal
//! `AuthError`; nothing after `deserialize_user` re-verifies the token.

use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::repository::User;
use super::session::ACCESS_TOKEN_COOKIE;
use super::state::AuthState;
use super::tokens::TokenKind;
use super::utils::{cookie_value, extract_bearer_token};

/// Authenticated user attached to the request by `deserialize_user`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Candidate access token: `Authorization: Bearer` wins over the cookie.
fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    cookie_value(headers, ACCESS_TOKEN_COOKIE)
}

/// Resolve the presented access token into a `CurrentUser` extension.
///
/// Token signature, session liveness, and user existence are all required;
/// the session payload, not the token `sub`, decides which user is loaded.
///
/// # Errors
/// Rejects with 401 when any stage of the resolution fails.
pub async fn deserialize_user(
    Extension(state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_access_token(request.headers())
        .ok_or(AuthError::AuthenticationRequired)?;

    let claims = state
        .tokens()
        .verify(&token, TokenKind::Access)
        .ok_or(AuthError::InvalidToken)?;
    let subject = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    let session = state
        .sessions()
        .get(subject)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::SessionInvalid)?;

    let user = state
        .users()
        .find_by_id(session.id)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::SessionInvalid)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Gate on a user already attached by `deserialize_user`.
///
/// # Errors
/// Rejects with 403 when no user is attached (misordered stages).
pub async fn require_user(request: Request, next: Next) -> Result<Response, AuthError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(AuthError::UnauthenticatedAccess);
    }

    Ok(next.run(request).await)
}

/// Per-route policy: the attached user must have a verified email.
///
/// # Errors
/// Rejects with 401 for unverified users, 403 when no user is attached.
pub async fn require_verified(request: Request, next: Next) -> Result<Response, AuthError> {
    match request.extensions().get::<CurrentUser>() {
        Some(current) if current.0.verified => Ok(next.run(request).await),
        Some(_) => Err(AuthError::AccountUnverified),
        None => Err(AuthError::UnauthenticatedAccess),
    }
}
