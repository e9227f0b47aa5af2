use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

/// Parsed auth options: token key material, lifetimes, and cookie policy.
#[derive(Debug)]
pub struct Options {
    pub access_private_key: SecretString,
    pub access_public_key: String,
    pub refresh_private_key: SecretString,
    pub refresh_public_key: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_minutes: i64,
    pub origin: String,
    pub secure_cookies: bool,
}

impl Options {
    /// Extract auth options from validated CLI matches.
    ///
    /// # Errors
    /// Returns an error if a required key argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let key = |name: &str| -> Result<String> {
            matches
                .get_one::<String>(name)
                .cloned()
                .with_context(|| format!("missing required argument: --{name}"))
        };

        Ok(Self {
            access_private_key: SecretString::from(key("access-token-private-key")?),
            access_public_key: key("access-token-public-key")?,
            refresh_private_key: SecretString::from(key("refresh-token-private-key")?),
            refresh_public_key: key("refresh-token-public-key")?,
            access_token_ttl_minutes: matches
                .get_one::<i64>("access-token-ttl-minutes")
                .copied()
                .unwrap_or(15),
            refresh_token_ttl_minutes: matches
                .get_one::<i64>("refresh-token-ttl-minutes")
                .copied()
                .unwrap_or(60),
            origin: matches
                .get_one::<String>("origin")
                .cloned()
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            secure_cookies: matches.get_flag("secure-cookies"),
        })
    }
}

pub fn with_args(command: Command) -> Command {
    let command = with_key_args(command);
    with_policy_args(command)
}

fn with_key_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("access-token-private-key")
                .long("access-token-private-key")
                .help("Base64-encoded Ed25519 PEM private key for access tokens")
                .env("JANUA_ACCESS_TOKEN_PRIVATE_KEY")
                .required(true),
        )
        .arg(
            Arg::new("access-token-public-key")
                .long("access-token-public-key")
                .help("Base64-encoded Ed25519 PEM public key for access tokens")
                .env("JANUA_ACCESS_TOKEN_PUBLIC_KEY")
                .required(true),
        )
        .arg(
            Arg::new("refresh-token-private-key")
                .long("refresh-token-private-key")
                .help("Base64-encoded Ed25519 PEM private key for refresh tokens")
                .env("JANUA_REFRESH_TOKEN_PRIVATE_KEY")
                .required(true),
        )
        .arg(
            Arg::new("refresh-token-public-key")
                .long("refresh-token-public-key")
                .help("Base64-encoded Ed25519 PEM public key for refresh tokens")
                .env("JANUA_REFRESH_TOKEN_PUBLIC_KEY")
                .required(true),
        )
}

fn with_policy_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("access-token-ttl-minutes")
                .long("access-token-ttl-minutes")
                .help("Access token lifetime in minutes")
                .env("JANUA_ACCESS_TOKEN_TTL_MINUTES")
                .default_value("15")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("refresh-token-ttl-minutes")
                .long("refresh-token-ttl-minutes")
                .help("Refresh token and session lifetime in minutes")
                .env("JANUA_REFRESH_TOKEN_TTL_MINUTES")
                .default_value("60")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .help("Frontend origin used for CORS and verification links")
                .env("JANUA_ORIGIN")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("secure-cookies")
                .long("secure-cookies")
                .help("Mark auth cookies Secure (required behind HTTPS in production)")
                .env("JANUA_SECURE_COOKIES")
                .action(clap::ArgAction::SetTrue),
        )
}
