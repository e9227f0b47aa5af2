//! Server-side session records: the revocation authority for issued tokens.
//!
//! The store maps a user id to a minimal JSON payload with a TTL equal to the
//! refresh-token lifetime. Presence of the key is what keeps a token usable;
//! deleting it revokes every outstanding token for that user. Absence of a
//! key is a normal outcome, and deleting a missing key is a no-op.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Minimal serialized session state. The `id` here, not the token `sub`, is
/// the authority for which user the pipeline loads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPayload {
    pub id: Uuid,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create or overwrite the session for `user_id` with the given TTL.
    async fn set(&self, user_id: Uuid, payload: &SessionPayload, ttl_seconds: u64) -> Result<()>;

    /// Fetch the live session for `user_id`, if any.
    async fn get(&self, user_id: Uuid) -> Result<Option<SessionPayload>>;

    /// Delete the session for `user_id`; missing keys are fine.
    async fn del(&self, user_id: Uuid) -> Result<()>;
}

/// Redis-backed store; each operation is a single atomic command.
#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, user_id: Uuid, payload: &SessionPayload, ttl_seconds: u64) -> Result<()> {
        let value = serde_json::to_string(payload).context("failed to serialize session")?;
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(user_id.to_string(), value, ttl_seconds)
            .await
            .context("failed to write session")?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<SessionPayload>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn
            .get(user_id.to_string())
            .await
            .context("failed to read session")?;

        match value {
            Some(raw) => {
                let payload =
                    serde_json::from_str(&raw).context("failed to deserialize session")?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn del(&self, user_id: Uuid) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(user_id.to_string())
            .await
            .context("failed to delete session")?;
        Ok(())
    }
}

/// In-memory store for tests and single-process local runs.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, (SessionPayload, Instant)>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, user_id: Uuid, payload: &SessionPayload, ttl_seconds: u64) -> Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        let mut sessions = self.sessions.lock().await;
        sessions.insert(user_id, (payload.clone(), expires_at));
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<SessionPayload>> {
        let mut sessions = self.sessions.lock().await;
        if let Some((payload, expires_at)) = sessions.get(&user_id) {
            if *expires_at > Instant::now() {
                return Ok(Some(payload.clone()));
            }
        }

        // Either absent or past its TTL; dropping the entry is a no-op if absent.
        sessions.remove(&user_id);
        Ok(None)
    }

    async fn del(&self, user_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySessionStore, SessionPayload, SessionStore};
    use anyhow::Result;
    use uuid::Uuid;

    #[tokio::test]
    async fn set_get_del_round_trips() -> Result<()> {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let payload = SessionPayload { id: user_id };

        store.set(user_id, &payload, 60).await?;
        assert_eq!(store.get(user_id).await?, Some(payload));

        store.del(user_id).await?;
        assert_eq!(store.get(user_id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn del_of_missing_key_is_a_noop() -> Result<()> {
        let store = MemorySessionStore::new();
        store.del(Uuid::new_v4()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_reads_as_absent() -> Result<()> {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        store
            .set(user_id, &SessionPayload { id: user_id }, 0)
            .await?;
        assert_eq!(store.get(user_id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn set_overwrites_existing_session() -> Result<()> {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();

        store
            .set(user_id, &SessionPayload { id: user_id }, 60)
            .await?;
        store.set(user_id, &SessionPayload { id: other }, 60).await?;

        assert_eq!(store.get(user_id).await?, Some(SessionPayload { id: other }));
        Ok(())
    }

    #[test]
    fn payload_serializes_to_minimal_json() -> Result<()> {
        let id = Uuid::nil();
        let json = serde_json::to_string(&SessionPayload { id })?;
        assert_eq!(
            json,
            format!("{{\"id\":\"{id}\"}}")
        );
        Ok(())
    }
}
