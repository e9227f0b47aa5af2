//! Email verification endpoint: consume the presented code and activate.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::error::AuthError;
use super::state::AuthState;
use super::types::ApiEnvelope;
use super::utils::hash_verification_code;

#[utoipa::path(
    get,
    path = "/api/auth/verifyemail/{verification_code}",
    params(
        ("verification_code" = String, Path, description = "One-time code from the verification email")
    ),
    responses(
        (status = 200, description = "Email verified", body = ApiEnvelope),
        (status = 401, description = "Unknown or already-consumed code", body = ApiEnvelope)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    state: Extension<Arc<AuthState>>,
    Path(verification_code): Path<String>,
) -> Result<Response, AuthError> {
    // Only hashes are stored, so lookup goes through a recomputed hash.
    let code_hash = hash_verification_code(verification_code.trim());

    let mut user = state
        .users()
        .find_by_verification_code_hash(&code_hash)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::VerificationFailed)?;

    user.verified = true;
    user.verification_code_hash = None;
    state.users().save(&user).await.map_err(AuthError::internal)?;

    Ok((
        StatusCode::OK,
        Json(ApiEnvelope::success_message("Email verified successfully")),
    )
        .into_response())
}
