//! Cookie issuance plus the refresh and logout endpoints.

use axum::{
    extract::Extension,
    http::{
        header::{HeaderValue, InvalidHeaderValue, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use super::error::AuthError;
use super::middleware::CurrentUser;
use super::state::{AuthConfig, AuthState};
use super::tokens::TokenKind;
use super::types::ApiEnvelope;
use super::utils::cookie_value;

pub(super) const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub(super) const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub(super) const LOGGED_IN_COOKIE: &str = "logged_in";

fn cookie(
    name: &str,
    value: &str,
    max_age_seconds: i64,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax; Max-Age={max_age_seconds}");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `access_token` + `logged_in` cookies, both on the access-token lifetime.
/// `logged_in` is deliberately not `HttpOnly`: it carries no secret and lets
/// client scripts detect login state.
pub(super) fn access_cookies(
    config: &AuthConfig,
    access_token: &str,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let max_age = config.access_token_ttl_minutes() * 60;
    let secure = config.secure_cookies();
    Ok(vec![
        cookie(ACCESS_TOKEN_COOKIE, access_token, max_age, true, secure)?,
        cookie(LOGGED_IN_COOKIE, "true", max_age, false, secure)?,
    ])
}

/// All three auth cookies, set on login.
pub(super) fn auth_cookies(
    config: &AuthConfig,
    access_token: &str,
    refresh_token: &str,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let refresh_max_age = config.refresh_token_ttl_minutes() * 60;
    let secure = config.secure_cookies();

    let mut cookies = access_cookies(config, access_token)?;
    cookies.push(cookie(
        REFRESH_TOKEN_COOKIE,
        refresh_token,
        refresh_max_age,
        true,
        secure,
    )?);
    Ok(cookies)
}

/// Expire all three cookies immediately.
pub(super) fn clear_cookies(config: &AuthConfig) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let secure = config.secure_cookies();
    Ok(vec![
        cookie(ACCESS_TOKEN_COOKIE, "", 0, true, secure)?,
        cookie(REFRESH_TOKEN_COOKIE, "", 0, true, secure)?,
        cookie(LOGGED_IN_COOKIE, "", 0, false, secure)?,
    ])
}

pub(super) fn set_cookie_headers(cookies: Vec<HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for value in cookies {
        headers.append(SET_COOKIE, value);
    }
    headers
}

/// Mint a new access token from a valid refresh token.
///
/// The refresh token and the session are left untouched: revocation lives in
/// the session store, so rotating the refresh token would add complexity
/// without closing anything the store doesn't already close.
#[utoipa::path(
    get,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New access token issued", body = ApiEnvelope),
        (status = 403, description = "Refresh token missing, invalid, or session gone", body = ApiEnvelope)
    ),
    tag = "auth"
)]
pub async fn refresh(
    headers: HeaderMap,
    state: Extension<Arc<AuthState>>,
) -> Result<Response, AuthError> {
    let refresh_token =
        cookie_value(&headers, REFRESH_TOKEN_COOKIE).ok_or(AuthError::RefreshFailed)?;

    let claims = state
        .tokens()
        .verify(&refresh_token, TokenKind::Refresh)
        .ok_or(AuthError::RefreshFailed)?;
    let subject = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::RefreshFailed)?;

    let session = state
        .sessions()
        .get(subject)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::RefreshFailed)?;

    // The user must still exist; the session payload decides which id to load.
    let user = state
        .users()
        .find_by_id(session.id)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::RefreshFailed)?;

    let access_token = state
        .tokens()
        .sign(user.id, TokenKind::Access)
        .map_err(AuthError::internal)?;

    let cookies = access_cookies(state.config(), &access_token)
        .map_err(|err| AuthError::internal(err.into()))?;

    Ok((
        StatusCode::OK,
        set_cookie_headers(cookies),
        Json(ApiEnvelope::success_token(access_token)),
    )
        .into_response())
}

/// Delete the server-side session and clear the auth cookies.
///
/// This is the actual revocation: a stolen access token stays
/// cryptographically valid until expiry but fails the pipeline's session
/// check the moment the key is gone.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked and cookies cleared", body = ApiEnvelope),
        (status = 401, description = "Not authenticated", body = ApiEnvelope)
    ),
    tag = "auth"
)]
pub async fn logout(
    Extension(current): Extension<CurrentUser>,
    state: Extension<Arc<AuthState>>,
) -> Result<Response, AuthError> {
    state
        .sessions()
        .del(current.0.id)
        .await
        .map_err(AuthError::internal)?;

    let cookies =
        clear_cookies(state.config()).map_err(|err| AuthError::internal(err.into()))?;

    Ok((
        StatusCode::OK,
        set_cookie_headers(cookies),
        Json(ApiEnvelope::success()),
    )
        .into_response())
}
