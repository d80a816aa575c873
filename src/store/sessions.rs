//! One [`TrackerStore`] per visitor.
//!
//! Each browser gets a random tracker id in its session cookie. The id maps
//! to its own view state, so a selection, an open create form or an unsaved
//! claim in one browser never shows up in another. Entries idle for longer
//! than the configured timeout are dropped, which also cancels their timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use actix_session::Session;
use tokio::time::Instant;
use uuid::Uuid;

use crate::models::config::DraftPolicy;
use crate::store::TrackerStore;

const SESSION_KEY: &str = "tracker_id";

/// Default time after which an untouched visitor state is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct SessionEntry {
    store: Arc<TrackerStore>,
    last_seen: Instant,
}

/// Registry of per-visitor view states.
#[derive(Debug)]
pub struct TrackerSessions {
    entries: Mutex<HashMap<String, SessionEntry>>,
    policy: DraftPolicy,
    claim_delay: Duration,
    idle_timeout: Duration,
}

impl TrackerSessions {
    pub fn new(policy: DraftPolicy, claim_delay: Duration, idle_timeout: Duration) -> Self {
        Self {
            entries: Mutex::default(),
            policy,
            claim_delay,
            idle_timeout,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// View state of the visitor behind `session`, starting one if needed.
    pub fn store_for(&self, session: &Session) -> Arc<TrackerStore> {
        let key = match session.get::<String>(SESSION_KEY) {
            Ok(Some(key)) => key,
            Ok(None) => start_session(session),
            Err(err) => {
                log::warn!("Unreadable tracker session, starting a new one: {err}");
                start_session(session)
            }
        };
        self.store(&key)
    }

    /// View state stored under `key`, created on first use.
    pub fn store(&self, key: &str) -> Arc<TrackerStore> {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        let mut entries = self.entries();

        let before = entries.len();
        entries.retain(|k, entry| k == key || now.duration_since(entry.last_seen) < idle_timeout);
        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("Dropped {evicted} idle tracker sessions");
        }

        let entry = entries.entry(key.to_string()).or_insert_with(|| SessionEntry {
            store: Arc::new(TrackerStore::new(self.policy, self.claim_delay)),
            last_seen: now,
        });
        entry.last_seen = now;
        Arc::clone(&entry.store)
    }

    pub fn session_count(&self) -> usize {
        self.entries().len()
    }

    /// Cancels the pending claim writes of every visitor and forgets them all.
    pub fn shutdown(&self) -> usize {
        let drained = self.entries().drain().collect::<Vec<_>>();
        drained
            .iter()
            .map(|(_, entry)| entry.store.shutdown())
            .sum()
    }
}

fn start_session(session: &Session) -> String {
    let key = Uuid::new_v4().to_string();
    if let Err(err) = session.insert(SESSION_KEY, &key) {
        log::error!("Failed to store tracker session id: {err}");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DishId;

    fn sessions(idle_timeout: Duration) -> TrackerSessions {
        TrackerSessions::new(
            DraftPolicy::Reset,
            Duration::from_millis(500),
            idle_timeout,
        )
    }

    #[test]
    fn visitors_get_separate_state() {
        let sessions = sessions(DEFAULT_IDLE_TIMEOUT);

        let first = sessions.store("first");
        let second = sessions.store("second");
        first.toggle_create_form();

        assert!(first.snapshot().show_create_event);
        assert!(!second.snapshot().show_create_event);
        assert!(Arc::ptr_eq(&first, &sessions.store("first")));
        assert_eq!(sessions.session_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_dropped() {
        let sessions = sessions(Duration::from_secs(60));
        let stale = sessions.store("stale");
        stale.toggle_create_form();

        tokio::time::advance(Duration::from_secs(30)).await;
        sessions.store("active");
        tokio::time::advance(Duration::from_secs(45)).await;
        sessions.store("active");

        assert_eq!(sessions.session_count(), 1);
        // A returning visitor starts over.
        assert!(!sessions.store("stale").snapshot().show_create_event);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers_of_every_visitor() {
        let sessions = sessions(DEFAULT_IDLE_TIMEOUT);
        let dish_id = DishId::new("d1").unwrap();

        sessions.store("a").claims().schedule(dish_id.clone(), async {});
        sessions.store("b").claims().schedule(dish_id, async {});

        assert_eq!(sessions.shutdown(), 2);
        assert_eq!(sessions.session_count(), 0);
    }
}
