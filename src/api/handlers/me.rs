//! Authenticated self-service endpoint.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::types::UserResponse;
use super::auth::CurrentUser;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub status: String,
    pub data: MeData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeData {
    pub user: UserResponse,
}

/// Return the authenticated user's profile; runs behind the full pipeline.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Authenticated user profile", body = MeResponse),
        (status = 401, description = "Missing, invalid, or revoked credentials"),
        (status = 403, description = "No authenticated user attached")
    ),
    tag = "users"
)]
pub async fn get_me(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    let response = MeResponse {
        status: "success".to_string(),
        data: MeData {
            user: UserResponse::from(&current.0),
        },
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::get_me;
    use crate::api::handlers::auth::repository::{Role, User};
    use crate::api::handlers::auth::CurrentUser;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    #[tokio::test]
    async fn me_returns_profile_without_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            verified: true,
            verification_code_hash: None,
        };

        let response = get_me(Extension(CurrentUser(user))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
