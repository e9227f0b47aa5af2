//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::repository::User;

/// Uniform response envelope: `status` is machine-checkable, `message` is for
/// humans, `access_token` rides along on login/refresh success.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl ApiEnvelope {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            access_token: None,
        }
    }

    #[must_use]
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.into()),
            access_token: None,
        }
    }

    #[must_use]
    pub fn success_token(access_token: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            access_token: Some(access_token.into()),
        }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            message: Some(message.into()),
            access_token: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            access_token: None,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "passwordConfirm")]
    pub password_confirm: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User fields safe to return to clients; never carries hashes.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            verified: user.verified,
        }
    }
}
