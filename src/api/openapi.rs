use crate::api::handlers::{health, me, auth::{login, register, session, verification}};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, mut api) = public_router().split_for_parts();
    let (_router, session_api) = session_router().split_for_parts();
    api.merge(session_api);
    let (_router, me_api) = me_router().split_for_parts();
    api.merge(me_api);
    api
}

/// Routes that need no prior authentication.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn public_router() -> OpenApiRouter {
    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Authentication and session lifecycle".to_string());

    let mut openapi = cargo_openapi();
    openapi.tags = Some(vec![auth_tag]);

    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let router = OpenApiRouter::with_openapi(openapi)
        .routes(routes!(health::health))
        .routes(routes!(register::register))
        .routes(routes!(login::login))
        .routes(routes!(session::refresh))
        .routes(routes!(verification::verify_email));

    router
}

/// Session routes gated by `deserialize_user` + `require_user`.
pub(crate) fn session_router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(session::logout))
}

/// Routes that additionally require a verified account.
pub(crate) fn me_router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(me::get_me))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}

#[cfg(test)]
mod tests {
    use super::openapi;

    #[test]
    fn document_covers_the_route_surface() {
        let api = openapi();
        let paths = &api.paths.paths;
        for path in [
            "/api/healthchecker",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/refresh",
            "/api/auth/logout",
            "/api/auth/verifyemail/{verification_code}",
            "/api/users/me",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn info_comes_from_cargo_metadata() {
        let api = openapi();
        assert_eq!(api.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(api.info.version, env!("CARGO_PKG_VERSION"));
    }
}
