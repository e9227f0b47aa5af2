//! # Janua (Authentication & Session Authority)
//!
//! `janua` authenticates users and authorizes their requests with short-lived
//! signed bearer tokens backed by a revocable, server-side session record.
//!
//! ## Tokens & Sessions
//!
//! Two token kinds are issued from independent Ed25519 key pairs: a
//! short-lived **access** token that authorizes requests and a long-lived
//! **refresh** token that only authorizes minting a new access token. A token
//! is never enough on its own: the session store (Redis, keyed by user id,
//! TTL equal to the refresh lifetime) must still hold a live session for that
//! user. Logout deletes the session key, which revokes every outstanding
//! token for the user even though the tokens themselves remain
//! cryptographically valid until expiry.
//!
//! ## Request Pipeline
//!
//! Protected routes run through ordered middleware stages:
//! `deserialize_user` (bearer header or `access_token` cookie, signature and
//! expiry check, session lookup, user load) followed by `require_user` and,
//! where route policy demands it, `require_verified`. Each stage short-circuits
//! with a terminal rejection; nothing downstream re-verifies the token.
//!
//! ## Email Verification
//!
//! Registration issues a one-time random verification code. Only its SHA-256
//! hash is stored on the user record; the plain code leaves the system once,
//! through the outbound notifier. Login is refused until the code is consumed.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
