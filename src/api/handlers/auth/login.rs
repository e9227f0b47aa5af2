//! Login endpoint: credentials in, tokens + session + cookies out.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::error::AuthError;
use super::password::verify_password;
use super::session::{auth_cookies, set_cookie_headers};
use super::session_store::SessionPayload;
use super::state::AuthState;
use super::tokens::TokenKind;
use super::types::{ApiEnvelope, LoginRequest};
use super::utils::normalize_email;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiEnvelope),
        (status = 400, description = "Invalid email or password", body = ApiEnvelope),
        (status = 401, description = "Account not verified", body = ApiEnvelope)
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, AuthError> {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(AuthError::Validation("Missing payload".to_string())),
    };

    let email = normalize_email(&request.email);

    // Unknown email and wrong password share one rejection so the response
    // can't be used to enumerate accounts.
    let user = state
        .users()
        .find_by_email(&email)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !user.verified {
        return Err(AuthError::AccountUnverified);
    }

    if !verify_password(&request.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let access_token = state
        .tokens()
        .sign(user.id, TokenKind::Access)
        .map_err(AuthError::internal)?;
    let refresh_token = state
        .tokens()
        .sign(user.id, TokenKind::Refresh)
        .map_err(AuthError::internal)?;

    state
        .sessions()
        .set(
            user.id,
            &SessionPayload { id: user.id },
            state.session_ttl_seconds(),
        )
        .await
        .map_err(AuthError::internal)?;

    debug!(user_id = %user.id, "login successful");

    let cookies = auth_cookies(state.config(), &access_token, &refresh_token)
        .map_err(|err| AuthError::internal(err.into()))?;

    Ok((
        StatusCode::OK,
        set_cookie_headers(cookies),
        Json(ApiEnvelope::success_token(access_token)),
    )
        .into_response())
}
