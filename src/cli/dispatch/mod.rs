//! Command-line argument dispatch and server initialization.
//!
//! Parses validated CLI matches and maps them to the action to run, carrying
//! the full server configuration state.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::auth;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let redis_url = matches
        .get_one::<String>("redis-url")
        .cloned()
        .context("missing required argument: --redis-url")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        redis_url,
        access_private_key: auth_opts.access_private_key,
        access_public_key: auth_opts.access_public_key,
        refresh_private_key: auth_opts.refresh_private_key,
        refresh_public_key: auth_opts.refresh_public_key,
        access_token_ttl_minutes: auth_opts.access_token_ttl_minutes,
        refresh_token_ttl_minutes: auth_opts.refresh_token_ttl_minutes,
        origin: auth_opts.origin,
        secure_cookies: auth_opts.secure_cookies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn dispatch_builds_server_action() {
        temp_env::with_vars([("JANUA_LOG_LEVEL", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "janua",
                "--dsn",
                "postgres://user@localhost:5432/janua",
                "--redis-url",
                "redis://cache:6379",
                "--access-token-private-key",
                "YQ==",
                "--access-token-public-key",
                "Yg==",
                "--refresh-token-private-key",
                "Yw==",
                "--refresh-token-public-key",
                "ZA==",
            ]);

            let action = handler(&matches).expect("dispatch should succeed");
            let Action::Server(args) = action;
            assert_eq!(args.port, 8080);
            assert_eq!(args.dsn, "postgres://user@localhost:5432/janua");
            assert_eq!(args.redis_url, "redis://cache:6379");
            assert_eq!(args.access_token_ttl_minutes, 15);
            assert_eq!(args.refresh_token_ttl_minutes, 60);
            assert!(!args.secure_cookies);
        });
    }
}
