//! API handlers for Janua.

pub mod auth;
pub mod health;
pub mod me;

use axum::http::Uri;

use self::auth::AuthError;

/// Fallback for unmatched routes: same envelope as every other rejection.
pub async fn not_found(uri: Uri) -> AuthError {
    AuthError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::not_found;
    use axum::http::{StatusCode, Uri};
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn unmatched_routes_get_the_envelope() {
        let uri: Uri = "/api/missing".parse().expect("valid uri");
        let response = not_found(uri).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
