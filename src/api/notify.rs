//! Outbound notification abstraction.
//!
//! Registration and verification flows hand a user and a link to a
//! `Notifier`; the implementation decides how to deliver (SMTP, API, etc.)
//! and returns `Ok`/`Err`. On delivery failure the caller clears the stored
//! verification-code hash so no undeliverable code stays valid.
//!
//! The default for local dev is `LogNotifier`, which logs and returns `Ok(())`.

use anyhow::Result;

use crate::api::handlers::auth::repository::User;

/// Delivery abstraction consumed by the auth flows.
pub trait Notifier: Send + Sync {
    /// Deliver the email-verification link or return an error.
    fn send_verification_code(&self, user: &User, url: &str) -> Result<()>;

    /// Deliver a password-reset link or return an error.
    fn send_password_reset(&self, user: &User, url: &str) -> Result<()>;
}

/// Local dev notifier that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_verification_code(&self, user: &User, url: &str) -> Result<()> {
        tracing::info!(
            to_email = %user.email,
            url = %url,
            "verification email send stub"
        );
        Ok(())
    }

    fn send_password_reset(&self, user: &User, url: &str) -> Result<()> {
        tracing::info!(
            to_email = %user.email,
            url = %url,
            "password reset email send stub"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LogNotifier, Notifier};
    use crate::api::handlers::auth::repository::{Role, User};
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            verified: false,
            verification_code_hash: None,
        }
    }

    #[test]
    fn log_notifier_always_delivers() {
        let notifier = LogNotifier;
        assert!(notifier
            .send_verification_code(&user(), "http://localhost:3000/verifyemail/code")
            .is_ok());
        assert!(notifier
            .send_password_reset(&user(), "http://localhost:3000/resetpassword/code")
            .is_ok());
    }
}
