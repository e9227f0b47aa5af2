//! User records and the repository seam the auth flows call through.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use super::utils::is_unique_violation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    /// Set only between verification-code issuance and consumption/clearing.
    pub verification_code_hash: Option<Vec<u8>>,
}

/// Fields needed to create a user; everything else starts at its default.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user with that email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new unverified user; fails with `DuplicateEmail` on conflict.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_verification_code_hash(&self, hash: &[u8]) -> Result<Option<User>>;

    /// Persist the mutable fields (`verified`, `verification_code_hash`).
    async fn save(&self, user: &User) -> Result<()>;
}

/// Postgres-backed repository.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::from_str(&role),
        verified: row.get("verified"),
        verification_code_hash: row.get("verification_code_hash"),
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role::text AS role, verified, verification_code_hash";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            r"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, $4::user_role)
        RETURNING {USER_COLUMNS}
    "
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row_to_user(&row)),
            Err(err) if is_unique_violation(&err) => Err(RepositoryError::DuplicateEmail),
            Err(err) => Err(RepositoryError::Other(
                anyhow::Error::new(err).context("failed to insert user"),
            )),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by email")?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by id")?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_verification_code_hash(&self, hash: &[u8]) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE verification_code_hash = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by verification code")?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn save(&self, user: &User) -> Result<()> {
        let query = r"
        UPDATE users
        SET verified = $2,
            verification_code_hash = $3,
            updated_at = NOW()
        WHERE id = $1
    ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user.id)
            .bind(user.verified)
            .bind(user.verification_code_hash.as_deref())
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to save user")?;
        Ok(())
    }
}

/// In-memory repository for tests and single-process local runs.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            verified: false,
            verification_code_hash: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_verification_code_hash(&self, hash: &[u8]) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|user| user.verification_code_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().await;
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryUserRepository, NewUser, RepositoryError, Role, UserRepository};
    use anyhow::Result;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn create_starts_unverified() -> Result<()> {
        let repo = MemoryUserRepository::new();
        let user = repo.create(new_user("alice@example.com")).await?;
        assert!(!user.verified);
        assert!(user.verification_code_hash.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> Result<()> {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("alice@example.com")).await?;
        let second = repo.create(new_user("alice@example.com")).await;
        assert!(matches!(second, Err(RepositoryError::DuplicateEmail)));
        Ok(())
    }

    #[tokio::test]
    async fn save_persists_verification_state() -> Result<()> {
        let repo = MemoryUserRepository::new();
        let mut user = repo.create(new_user("alice@example.com")).await?;

        user.verification_code_hash = Some(vec![1, 2, 3]);
        repo.save(&user).await?;
        let found = repo.find_by_verification_code_hash(&[1, 2, 3]).await?;
        assert_eq!(found.map(|u| u.id), Some(user.id));

        user.verified = true;
        user.verification_code_hash = None;
        repo.save(&user).await?;
        let reloaded = repo.find_by_id(user.id).await?.expect("user exists");
        assert!(reloaded.verified);
        assert!(reloaded.verification_code_hash.is_none());
        Ok(())
    }

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::from_str(Role::Admin.as_str()), Role::Admin);
        assert_eq!(Role::from_str("unknown"), Role::User);
    }
}
