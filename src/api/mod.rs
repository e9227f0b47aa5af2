use crate::api::handlers::auth::{
    self, repository::PgUserRepository, session_store::RedisSessionStore, AuthConfig, AuthState,
    TokenKeyConfig, TokenService,
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware, Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;

pub mod handlers;
pub mod notify;
mod openapi;

pub use openapi::openapi;

/// Build the application router around a fully assembled auth state.
///
/// Protected routes are wrapped by the pipeline stages; `/api/users/me`
/// additionally carries the verified-account policy, logout deliberately
/// does not (an unverified user can still log out).
///
/// # Errors
/// Returns an error if the configured origin cannot be parsed for CORS.
pub fn app(state: Arc<AuthState>) -> Result<Router> {
    let origin = cors_origin(state.config().origin())?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true);

    let (public, _api) = openapi::public_router().split_for_parts();
    let (session, _api) = openapi::session_router().split_for_parts();
    let (me, _api) = openapi::me_router().split_for_parts();

    let protected = session
        .merge(me.route_layer(middleware::from_fn(auth::require_verified)))
        .route_layer(middleware::from_fn(auth::require_user))
        .route_layer(middleware::from_fn(auth::deserialize_user));

    let app = public
        .merge(protected)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        );

    Ok(app)
}

/// Start the server
///
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: String,
    redis_url: String,
    config: AuthConfig,
    keys: TokenKeyConfig,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    // Connect to the session store
    let client = redis::Client::open(redis_url).context("Invalid session store URL")?;
    let manager = redis::aio::ConnectionManager::new(client)
        .await
        .context("Failed to connect to session store")?;

    let tokens = TokenService::from_config(
        &keys,
        config.access_token_ttl_minutes(),
        config.refresh_token_ttl_minutes(),
    )?;

    let state = Arc::new(AuthState::new(
        config,
        tokens,
        Arc::new(PgUserRepository::new(pool)),
        Arc::new(RedisSessionStore::new(manager)),
        Arc::new(notify::LogNotifier),
    ));

    let app = app(state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn cors_origin(origin: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(origin).with_context(|| format!("Invalid origin URL: {origin}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Origin URL must include a valid host: {origin}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let value = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&value).context("Failed to build origin header")
}

#[cfg(test)]
mod tests {
    use super::cors_origin;

    #[test]
    fn cors_origin_strips_path_and_keeps_port() {
        let value = cors_origin("http://localhost:3000/app/").expect("origin parses");
        assert_eq!(value.to_str().expect("ascii"), "http://localhost:3000");
    }

    #[test]
    fn cors_origin_rejects_garbage() {
        assert!(cors_origin("not a url").is_err());
    }
}
