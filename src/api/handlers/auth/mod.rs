//! Auth handlers and supporting modules.
//!
//! This module owns the authentication and session lifecycle: token issuance
//! and verification, the Redis-backed session record that makes tokens
//! revocable, email-verification codes, and the middleware pipeline that
//! gates protected routes.
//!
//! ## Revocation Model
//!
//! A token alone never authorizes a request. `deserialize_user` requires the
//! signature to verify, the session key to exist, and the user to still
//! exist. Logout deletes the session key, so a leaked access token dies with
//! the session even though its signature stays valid until expiry.
//!
//! ## Key Separation
//!
//! Access and refresh tokens use independent Ed25519 key pairs; a refresh
//! token can only mint a new access token and is never accepted by the
//! pipeline itself.

pub(crate) mod error;
pub(crate) mod login;
pub(crate) mod middleware;
pub mod password;
pub(crate) mod register;
pub mod repository;
pub(crate) mod session;
pub mod session_store;
mod state;
pub mod tokens;
pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub use error::AuthError;
pub use middleware::{deserialize_user, require_user, require_verified, CurrentUser};
pub use state::{AuthConfig, AuthState};
pub use tokens::{TokenKeyConfig, TokenKind, TokenService};
