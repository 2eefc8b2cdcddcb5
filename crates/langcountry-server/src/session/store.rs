//! Session storage backends.

use super::SessionId;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default idle time after which an in-memory session is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Default number of sessions kept in memory.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Key/value storage scoped per session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read one value of a session.
    async fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError>;

    /// Write one value of a session.
    async fn put(&self, session: &SessionId, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop sessions that have been idle too long, returning how many went.
    ///
    /// Backends that expire sessions on their own keep the default.
    async fn purge_expired(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}

struct SessionEntry {
    values: HashMap<String, String>,
    touched: Instant,
}

impl SessionEntry {
    fn is_expired(&self, idle_timeout: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.touched) >= idle_timeout
    }
}

/// In-memory session store.
///
/// Sessions expire after `idle_timeout` without a read or write. Once more
/// than `max_sessions` are held, expired sessions are purged and then the
/// least recently touched ones are evicted.
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }

    /// Store with an explicit idle timeout and session cap.
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of sessions holding at least one value.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn purge(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| !entry.is_expired(self.idle_timeout, now));
        before.saturating_sub(self.sessions.len())
    }

    /// Keep the store within `max_sessions`, never evicting `keep`.
    fn evict_if_needed(&self, keep: &SessionId) {
        if self.sessions.len() <= self.max_sessions {
            return;
        }

        let purged = self.purge();
        let mut evicted = 0usize;
        while self.sessions.len() > self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .filter(|entry| entry.key() != keep)
                .min_by_key(|entry| entry.value().touched)
                .map(|entry| *entry.key());

            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    evicted += 1;
                }
                None => break,
            }
        }

        debug!(purged, evicted, sessions = self.sessions.len(), "session store trimmed");
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        if let Some(mut entry) = self.sessions.get_mut(session) {
            if !entry.is_expired(self.idle_timeout, now) {
                entry.touched = now;
                return Ok(entry.values.get(key).cloned());
            }
        }

        self.sessions
            .remove_if(session, |_, entry| entry.is_expired(self.idle_timeout, now));
        Ok(None)
    }

    async fn put(&self, session: &SessionId, key: &str, value: &str) -> Result<(), StoreError> {
        let now = Instant::now();
        {
            let mut entry = self.sessions.entry(*session).or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                touched: now,
            });
            if entry.is_expired(self.idle_timeout, now) {
                entry.values.clear();
            }
            entry.touched = now;
            entry.values.insert(key.to_string(), value.to_string());
        }

        self.evict_if_needed(session);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        Ok(self.purge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_are_scoped_per_session() {
        let store = InMemorySessionStore::new();
        let first = SessionId::generate();
        let second = SessionId::generate();

        store.put(&first, "language_code", "nl").await.unwrap();
        store.put(&second, "language_code", "es_CO").await.unwrap();

        assert_eq!(store.get(&first, "language_code").await.unwrap().as_deref(), Some("nl"));
        assert_eq!(store.get(&second, "language_code").await.unwrap().as_deref(), Some("es_CO"));
        assert_eq!(store.get(&first, "locale").await.unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemorySessionStore::default();
        let session = SessionId::generate();
        assert!(store.is_empty());

        store.put(&session, "locale", "nl").await.unwrap();
        store.put(&session, "locale", "de").await.unwrap();
        assert_eq!(store.get(&session, "locale").await.unwrap().as_deref(), Some("de"));
    }

    #[tokio::test]
    async fn test_session_count_is_capped() {
        let store = InMemorySessionStore::with_limits(DEFAULT_IDLE_TIMEOUT, 100);

        let mut last = SessionId::generate();
        for _ in 0..500 {
            last = SessionId::generate();
            store.put(&last, "language_code", "nl").await.unwrap();
        }

        assert_eq!(store.len(), 100);
        assert_eq!(store.get(&last, "language_code").await.unwrap().as_deref(), Some("nl"));
    }

    #[tokio::test]
    async fn test_least_recently_touched_session_is_evicted() {
        let store = InMemorySessionStore::with_limits(DEFAULT_IDLE_TIMEOUT, 2);
        let first = SessionId::generate();
        let second = SessionId::generate();
        let third = SessionId::generate();

        store.put(&first, "language_code", "nl").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.put(&second, "language_code", "de").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        // Reading keeps the first session alive.
        store.get(&first, "language_code").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.put(&third, "language_code", "es_CO").await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&second, "language_code").await.unwrap(), None);
        assert_eq!(store.get(&first, "language_code").await.unwrap().as_deref(), Some("nl"));
        assert_eq!(store.get(&third, "language_code").await.unwrap().as_deref(), Some("es_CO"));
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = InMemorySessionStore::with_limits(Duration::from_millis(20), 100);
        let stale = SessionId::generate();
        let other = SessionId::generate();
        store.put(&stale, "language_code", "nl").await.unwrap();
        store.put(&other, "language_code", "de").await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get(&stale, "language_code").await.unwrap(), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_starts_empty_on_write() {
        let store = InMemorySessionStore::with_limits(Duration::from_millis(20), 100);
        let session = SessionId::generate();
        store.put(&session, "language_code", "nl").await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        store.put(&session, "locale", "de").await.unwrap();

        assert_eq!(store.get(&session, "language_code").await.unwrap(), None);
        assert_eq!(store.get(&session, "locale").await.unwrap().as_deref(), Some("de"));
    }
}
