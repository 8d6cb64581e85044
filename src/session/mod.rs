mod memory;

pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};

/// Name of the signed cookie carrying the session id.
pub const SESSION_COOKIE: &str = "deskreg_session";

/// Server-side session payload, looked up fresh on every protected request.
///
/// Logout overwrites the fields back to their anonymous defaults rather than
/// deleting the record, matching the cookie-store behavior the rest of the
/// application expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub authenticated: bool,
    pub user_id: String,
    pub username: String,
    /// Formatted timestamp of the moment the user logged in.
    pub logged_on: String,
}

/// SessionStore defines the session persistence interface, keyed by the
/// opaque id carried in the signed cookie. Injected into `AppState` so tests
/// can substitute a fake.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &str) -> Option<SessionData>;
    fn set(&self, id: &str, data: SessionData);
    fn delete(&self, id: &str);
}
