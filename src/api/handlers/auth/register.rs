//! Registration endpoint: create the user, issue a verification code, notify.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use super::error::AuthError;
use super::password::hash_password;
use super::repository::{NewUser, RepositoryError, Role};
use super::state::AuthState;
use super::types::{ApiEnvelope, RegisterRequest};
use super::utils::{build_verify_url, generate_verification_code, normalize_email, valid_email};

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 32;

fn validate(request: &RegisterRequest, email: &str) -> Result<(), AuthError> {
    if request.name.trim().is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }
    if !valid_email(email) {
        return Err(AuthError::Validation("Invalid email address".to_string()));
    }
    let length = request.password.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(AuthError::Validation(
            "Password must be between 8 and 32 characters".to_string(),
        ));
    }
    if request.password != request.password_confirm {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, verification email sent", body = ApiEnvelope),
        (status = 400, description = "Validation error", body = ApiEnvelope),
        (status = 409, description = "Email already registered", body = ApiEnvelope),
        (status = 500, description = "Verification email delivery failed", body = ApiEnvelope)
    ),
    tag = "auth"
)]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Response, AuthError> {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(AuthError::Validation("Missing payload".to_string())),
    };

    let email = normalize_email(&request.email);
    validate(&request, &email)?;

    let password_hash = hash_password(&request.password).map_err(AuthError::internal)?;

    let mut user = state
        .users()
        .create(NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(|err| match err {
            RepositoryError::DuplicateEmail => AuthError::DuplicateAccount,
            RepositoryError::Other(err) => AuthError::internal(err),
        })?;

    // Store only the hash; the plain code leaves through the notifier once.
    let (code, code_hash) = generate_verification_code().map_err(AuthError::internal)?;
    user.verification_code_hash = Some(code_hash);
    state.users().save(&user).await.map_err(AuthError::internal)?;

    let verify_url = build_verify_url(state.config().origin(), &code);
    if let Err(err) = state.notifier().send_verification_code(&user, &verify_url) {
        error!("failed to send verification email: {err:#}");

        // An undeliverable code must not stay valid; the user re-requests one.
        user.verification_code_hash = None;
        state.users().save(&user).await.map_err(AuthError::internal)?;

        return Err(AuthError::DeliveryFailure);
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::success_message(
            "An email with a verification code has been sent to your address",
        )),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::api::handlers::auth::types::RegisterRequest;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            password_confirm: "password123".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(validate(&request(), "alice@example.com").is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let mut request = request();
        request.name = "  ".to_string();
        assert!(validate(&request, "alice@example.com").is_err());
    }

    #[test]
    fn rejects_bad_email() {
        assert!(validate(&request(), "not-an-email").is_err());
    }

    #[test]
    fn rejects_out_of_range_passwords() {
        let mut request = request();
        request.password = "short".to_string();
        request.password_confirm = "short".to_string();
        assert!(validate(&request, "alice@example.com").is_err());

        let long = "x".repeat(33);
        request.password = long.clone();
        request.password_confirm = long;
        assert!(validate(&request, "alice@example.com").is_err());
    }

    #[test]
    fn rejects_mismatched_confirmation() {
        let mut request = request();
        request.password_confirm = "password124".to_string();
        assert!(validate(&request, "alice@example.com").is_err());
    }
}
