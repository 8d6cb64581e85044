use std::collections::HashMap;
use std::sync::Mutex;

use super::{SessionData, SessionStore};

/// Once the map holds this many records, inserting a new id first sweeps
/// out the anonymous ones (logged-out sessions keep their record, so the
/// map would otherwise grow without bound).
const EVICT_THRESHOLD: usize = 10_000;

/// In-process session store. Sessions do not survive a restart, which is
/// acceptable for an internal tool; swap the trait object for a persistent
/// implementation if that changes.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionData>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &str) -> Option<SessionData> {
        self.sessions().get(id).cloned()
    }

    fn set(&self, id: &str, data: SessionData) {
        let mut sessions = self.sessions();
        if sessions.len() >= EVICT_THRESHOLD && !sessions.contains_key(id) {
            sessions.retain(|_, session| session.authenticated);
        }
        sessions.insert(id.to_string(), data);
    }

    fn delete(&self, id: &str) {
        self.sessions().remove(id);
    }
}
