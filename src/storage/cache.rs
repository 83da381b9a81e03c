//! In-memory TTL cache in front of the SQLite state store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::core::types::UserState;

/// Cache of recently used conversation states keyed by telegram id.
///
/// Entries expire after a fixed TTL; the store refreshes them from the
/// database on a miss. The cache is injected into the store so tests can
/// construct one with a short (or zero) TTL.
pub struct StateCache {
    entries: Mutex<HashMap<i64, (UserState, Instant)>>,
    ttl: Duration,
}

impl StateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached state if present and not expired.
    pub async fn get(&self, telegram_id: i64) -> Option<UserState> {
        let mut entries = self.entries.lock().await;
        match entries.get(&telegram_id) {
            Some((state, stored_at)) if stored_at.elapsed() < self.ttl => Some(state.clone()),
            Some(_) => {
                entries.remove(&telegram_id);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, state: UserState) {
        let mut entries = self.entries.lock().await;
        entries.insert(state.telegram_id, (state, Instant::now()));
    }

    pub async fn invalidate(&self, telegram_id: i64) {
        self.entries.lock().await.remove(&telegram_id);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
