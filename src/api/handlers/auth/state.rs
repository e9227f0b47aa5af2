//! Auth configuration and shared state.

use std::sync::Arc;

use crate::api::notify::Notifier;

use super::repository::UserRepository;
use super::session_store::SessionStore;
use super::tokens::{TokenKind, TokenService};

const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
const DEFAULT_REFRESH_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    origin: String,
    access_token_ttl_minutes: i64,
    refresh_token_ttl_minutes: i64,
    secure_cookies: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(origin: String) -> Self {
        // Behind plain HTTP (local dev) Secure cookies would never be sent.
        let secure_cookies = origin.starts_with("https://");

        Self {
            origin,
            access_token_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_minutes: DEFAULT_REFRESH_TOKEN_TTL_MINUTES,
            secure_cookies,
        }
    }

    #[must_use]
    pub fn with_access_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_refresh_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.refresh_token_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn access_token_ttl_minutes(&self) -> i64 {
        self.access_token_ttl_minutes
    }

    #[must_use]
    pub fn refresh_token_ttl_minutes(&self) -> i64 {
        self.refresh_token_ttl_minutes
    }

    pub(crate) fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        tokens: TokenService,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            tokens,
            users,
            sessions,
            notifier,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub(crate) fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub(crate) fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Session TTL tracks the refresh-token lifetime.
    pub(crate) fn session_ttl_seconds(&self) -> u64 {
        u64::try_from(self.tokens.ttl_seconds(TokenKind::Refresh)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::AuthConfig;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("http://localhost:3000".to_string());

        assert_eq!(config.origin(), "http://localhost:3000");
        assert_eq!(
            config.access_token_ttl_minutes(),
            super::DEFAULT_ACCESS_TOKEN_TTL_MINUTES
        );
        assert_eq!(
            config.refresh_token_ttl_minutes(),
            super::DEFAULT_REFRESH_TOKEN_TTL_MINUTES
        );
        assert!(!config.secure_cookies());

        let config = config
            .with_access_token_ttl_minutes(5)
            .with_refresh_token_ttl_minutes(120)
            .with_secure_cookies(true);

        assert_eq!(config.access_token_ttl_minutes(), 5);
        assert_eq!(config.refresh_token_ttl_minutes(), 120);
        assert!(config.secure_cookies());
    }

    #[test]
    fn https_origin_defaults_to_secure_cookies() {
        let config = AuthConfig::new("https://app.janua.dev".to_string());
        assert!(config.secure_cookies());
    }
}
