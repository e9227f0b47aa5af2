//! Authentication failure taxonomy and the terminal response mapping.
//!
//! Every expected failure carries its own status and user-facing message;
//! anything unexpected collapses into `Internal` and is logged, never leaked.
//! The `IntoResponse` impl is the single place responses are shaped, so every
//! handler and middleware stage rejects through the same envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use super::types::ApiEnvelope;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("You are not logged in")]
    AuthenticationRequired,
    #[error("Invalid token or user doesn't exist")]
    InvalidToken,
    #[error("Invalid token or session has expired")]
    SessionInvalid,
    #[error("You are not verified, check your email to verify your account")]
    AccountUnverified,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Unauthenticated access attempted")]
    UnauthenticatedAccess,
    #[error("Could not refresh access token")]
    RefreshFailed,
    #[error("User with that email already exists")]
    DuplicateAccount,
    #[error("There was an error sending email, please try again")]
    DeliveryFailure,
    #[error("Could not verify email")]
    VerificationFailed,
    #[error("{0}")]
    Validation(String),
    #[error("Route {0} not found")]
    NotFound(String),
    #[error("Something went wrong")]
    Internal(anyhow::Error),
}

impl AuthError {
    pub(crate) fn internal(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired
            | Self::InvalidToken
            | Self::SessionInvalid
            | Self::AccountUnverified
            | Self::VerificationFailed => StatusCode::UNAUTHORIZED,
            Self::InvalidCredentials | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnauthenticatedAccess | Self::RefreshFailed => StatusCode::FORBIDDEN,
            Self::DuplicateAccount => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DeliveryFailure | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!("unhandled error: {err:#}");
        }

        let status = self.status_code();
        let envelope = if status.is_server_error() {
            ApiEnvelope::error(self.to_string())
        } else {
            ApiEnvelope::fail(self.to_string())
        };

        (status, Json(envelope)).into_response()
    }
}
