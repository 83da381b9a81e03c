//! Conversation state store: SQLite behind a TTL cache.
//!
//! `get` and `save` never fail the caller. A lost database is logged and
//! the bot keeps answering with an in-memory default state instead of
//! going silent mid-conversation.

use chrono::{Duration, Utc};

use crate::core::config;
use crate::core::error::FlowError;
use crate::core::types::{ContactRecord, UserState};
use crate::storage::cache::StateCache;
use crate::storage::db::{self, DbPool};

pub struct UserStateStore {
    pool: DbPool,
    cache: StateCache,
}

impl UserStateStore {
    pub fn new(pool: DbPool, cache: StateCache) -> Self {
        Self { pool, cache }
    }

    /// Loads the user's state, creating a fresh one for first contact.
    ///
    /// Database errors degrade to a default state so the conversation can
    /// continue; the state is simply not durable until the next save.
    pub async fn get(&self, telegram_id: i64, username: Option<&str>) -> UserState {
        if let Some(mut state) = self.cache.get(telegram_id).await {
            if username.is_some() && state.username.as_deref() != username {
                state.username = username.map(str::to_owned);
            }
            return state;
        }

        let loaded = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::get_user_state(&conn, telegram_id).map_err(FlowError::from));

        let mut state = match loaded {
            Ok(Some(state)) => state,
            Ok(None) => UserState::new(telegram_id),
            Err(e) => {
                log::error!("Failed to load state for user {}: {}", telegram_id, e);
                UserState::new(telegram_id)
            }
        };

        if username.is_some() && state.username.as_deref() != username {
            state.username = username.map(str::to_owned);
        }

        self.cache.insert(state.clone()).await;
        state
    }

    /// Persists the state and refreshes the cache.
    ///
    /// Returns the stored row, or `None` when the write failed. Failures
    /// are logged, never propagated.
    pub async fn save(&self, state: UserState) -> Option<UserState> {
        let telegram_id = state.telegram_id;
        let saved = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::upsert_user_state(&conn, &state).map_err(FlowError::from));

        match saved {
            Ok(saved) => {
                self.cache.insert(saved.clone()).await;
                Some(saved)
            }
            Err(e) => {
                log::error!("Failed to save state for user {}: {}", telegram_id, e);
                // Keep the in-memory copy so the conversation stays coherent.
                self.cache.insert(state).await;
                None
            }
        }
    }

    /// Resets the conversation back to profession selection, keeping the
    /// contact record on file.
    pub async fn reset(&self, telegram_id: i64, username: Option<&str>) -> UserState {
        let mut state = self.get(telegram_id, username).await;
        state.reset();
        self.save(state.clone()).await.unwrap_or(state)
    }

    pub async fn save_contact(
        &self,
        telegram_id: i64,
        contact: &ContactRecord,
    ) -> Result<(), FlowError> {
        let conn = db::get_connection(&self.pool)?;
        db::save_contact(&conn, telegram_id, contact)?;
        self.cache.invalidate(telegram_id).await;
        Ok(())
    }

    pub async fn has_contact(&self, telegram_id: i64) -> bool {
        let result = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::has_contact(&conn, telegram_id).map_err(FlowError::from));
        match result {
            Ok(found) => found,
            Err(e) => {
                log::error!("Failed to look up contact for user {}: {}", telegram_id, e);
                false
            }
        }
    }

    pub async fn get_contact(&self, telegram_id: i64) -> Option<ContactRecord> {
        let result = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::get_contact(&conn, telegram_id).map_err(FlowError::from));
        match result {
            Ok(contact) => contact,
            Err(e) => {
                log::error!("Failed to load contact for user {}: {}", telegram_id, e);
                None
            }
        }
    }

    /// States of users with a delivered test task, for the reminder sweep.
    pub async fn states_with_tasks(&self) -> Vec<UserState> {
        let result = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::get_states_with_tasks(&conn).map_err(FlowError::from));
        match result {
            Ok(states) => states,
            Err(e) => {
                log::error!("Failed to load states with tasks: {}", e);
                Vec::new()
            }
        }
    }

    /// Purges abandoned conversations older than the retention window.
    pub async fn cleanup_stale(&self) -> usize {
        let cutoff = Utc::now() - Duration::hours(config::state::RETENTION_HOURS);
        let result = db::get_connection(&self.pool)
            .map_err(FlowError::from)
            .and_then(|conn| db::delete_stale_states(&conn, cutoff).map_err(FlowError::from));
        match result {
            Ok(purged) => {
                if purged > 0 {
                    log::info!("Purged {} stale conversation state(s)", purged);
                    self.cache.clear().await;
                }
                purged
            }
            Err(e) => {
                log::error!("Failed to purge stale states: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Profession, Step};
    use std::time::Duration as StdDuration;

    fn test_store() -> (UserStateStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let pool = db::create_pool(path.to_str().unwrap()).unwrap();
        let store = UserStateStore::new(pool, StateCache::new(StdDuration::from_secs(60)));
        (store, dir)
    }

    #[tokio::test]
    async fn get_returns_default_for_unknown_user() {
        let (store, _dir) = test_store();
        let state = store.get(555, Some("ann")).await;
        assert_eq!(state.telegram_id, 555);
        assert_eq!(state.current_step, Step::Start);
        assert_eq!(state.username.as_deref(), Some("ann"));
        assert!(state.id.is_none());
    }

    #[tokio::test]
    async fn save_then_get_uses_persisted_row() {
        let (store, _dir) = test_store();
        let mut state = store.get(1, None).await;
        state.update_step(Step::ProfessionSelection);
        state.select_profession(Profession::Ba);

        let saved = store.save(state).await.unwrap();
        assert!(saved.id.is_some());

        store.cache.clear().await;
        let reloaded = store.get(1, None).await;
        assert_eq!(reloaded.current_step, Step::ProfessionSelection);
        assert_eq!(reloaded.selected_profession, Some(Profession::Ba));
    }

    #[tokio::test]
    async fn reset_keeps_contact_on_file() {
        let (store, _dir) = test_store();
        let mut state = store.get(1, None).await;
        state.update_step(Step::TaskDelivery);
        store.save(state).await.unwrap();

        let contact = ContactRecord::new("+380501234567".into(), "Ann".into(), None);
        store.save_contact(1, &contact).await.unwrap();

        let reset = store.reset(1, None).await;
        assert_eq!(reset.current_step, Step::ProfessionSelection);
        assert!(reset.selected_profession.is_none());
        assert!(store.has_contact(1).await);
    }
}
