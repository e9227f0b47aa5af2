use crate::api::{self, handlers::auth::AuthConfig, handlers::auth::TokenKeyConfig};
use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

/// Everything the server action needs, assembled by dispatch.
#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub redis_url: String,
    pub access_private_key: SecretString,
    pub access_public_key: String,
    pub refresh_private_key: SecretString,
    pub refresh_public_key: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_minutes: i64,
    pub origin: String,
    pub secure_cookies: bool,
}

/// Handle the server action
///
/// # Errors
/// Returns an error if the server fails to start.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => {
            let config = AuthConfig::new(args.origin)
                .with_access_token_ttl_minutes(args.access_token_ttl_minutes)
                .with_refresh_token_ttl_minutes(args.refresh_token_ttl_minutes)
                .with_secure_cookies(args.secure_cookies);

            let keys = TokenKeyConfig {
                access_private_key: args.access_private_key,
                access_public_key: args.access_public_key,
                refresh_private_key: args.refresh_private_key,
                refresh_public_key: args.refresh_public_key,
            };

            api::new(args.port, args.dsn, args.redis_url, config, keys).await?;
        }
    }

    Ok(())
}
