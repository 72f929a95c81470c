// src/session/memory.rs

use crate::error::Result;
use crate::session::{Session, SessionStore, SessionUser};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{thread_rng, RngCore};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

/// Session store held in process memory.
///
/// Expiry is checked when a session is read; expired entries are also
/// swept whenever a new session is created.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
        }
    }

    fn generate_session_id() -> String {
        let mut bytes = [0u8; 32];
        thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    async fn purge_expired(&self) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed_count = removed, "Purged expired sessions");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user: SessionUser) -> Result<Session> {
        self.purge_expired().await;

        let session = Session {
            id: Self::generate_session_id(),
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            user,
        };

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        info!(
            session.user = %session.user.username,
            session.expires_at = %session.expires_at,
            "Session created"
        );
        Ok(session)
    }

    async fn get(&self, id: &str) -> Result<Option<SessionUser>> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return Ok(None),
                Some(session) if !session.is_expired_at(now) => {
                    return Ok(Some(session.user.clone()));
                }
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock, re-checking in case it was replaced.
        let mut sessions = self.sessions.write().await;
        if sessions.get(id).map_or(false, |s| s.is_expired_at(now)) {
            sessions.remove(id);
            trace!("Expired session evicted on read");
        }
        Ok(None)
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        if self.sessions.write().await.remove(id).is_some() {
            info!("Session destroyed");
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration as StdDuration;

    fn admin() -> SessionUser {
        SessionUser {
            username: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = InMemorySessionStore::new(StdDuration::from_secs(3600));
        let session = store.create(admin()).await.unwrap();

        assert_eq!(session.id.len(), 64);
        assert_eq!(store.get(&session.id).await.unwrap(), Some(admin()));
        assert!(session.expires_at > Utc::now() + Duration::minutes(59));
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let store = InMemorySessionStore::new(StdDuration::from_secs(3600));
        assert_eq!(store.get("does-not-exist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemorySessionStore::new(StdDuration::from_secs(3600));
        let mut ids = HashSet::new();
        for _ in 0..50 {
            ids.insert(store.create(admin()).await.unwrap().id);
        }
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let store = InMemorySessionStore::new(StdDuration::from_secs(3600));
        let session = store.create(admin()).await.unwrap();

        store.destroy(&session.id).await.unwrap();
        store.destroy(&session.id).await.unwrap();
        store.destroy("never-existed").await.unwrap();

        assert_eq!(store.get(&session.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_none_and_evicted() {
        let store = InMemorySessionStore::new(StdDuration::ZERO);
        let session = store.create(admin()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        assert_eq!(store.get(&session.id).await.unwrap(), None);
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_ttl_expires_after_wait() {
        let store = InMemorySessionStore::new(StdDuration::from_millis(50));
        let session = store.create(admin()).await.unwrap();
        assert!(store.get(&session.id).await.unwrap().is_some());

        tokio::time::sleep(StdDuration::from_millis(80)).await;
        assert!(store.get(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_purges_expired_sessions() {
        let store = InMemorySessionStore::new(StdDuration::ZERO);
        store.create(admin()).await.unwrap();
        store.create(admin()).await.unwrap();
        // Each create sweeps the previously expired entry first.
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
