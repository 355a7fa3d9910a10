// Session registry
//
// Maps session id to the server-held state behind a bearer token: the
// profile, a shared driver handle, and the session's own cursor registry.
// The store is generic over the handle type; the server instantiates it
// with the pooled driver session, tests with a stub.
//
// Deleting a session drops its handle reference only. The pool owns the
// underlying handle and may keep serving it to other sessions on the same
// profile.

use crate::cursor::CursorStore;
use crate::error::{StateError, StateResult};
use kassie_commons::Profile;
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sessions idle longer than this are evicted.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Server-held state for one authenticated caller.
pub struct Session<C> {
    pub id: String,
    pub profile: Profile,
    pub connection: Arc<C>,
    pub cursors: CursorStore,
    pub created_at: chrono::DateTime<chrono::Utc>,
    last_access: Mutex<Instant>,
}

impl<C> Session<C> {
    fn new(id: String, profile: Profile, connection: Arc<C>) -> Self {
        Self {
            id,
            profile,
            connection,
            cursors: CursorStore::new(),
            created_at: chrono::Utc::now(),
            last_access: Mutex::new(Instant::now()),
        }
    }

    pub fn touch(&self) {
        *self.last_access.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_access.lock().elapsed()
    }
}

/// Registry of live sessions keyed by id.
pub struct SessionStore<C> {
    sessions: RwLock<HashMap<String, Arc<Session<C>>>>,
    ttl: Duration,
}

impl<C> SessionStore<C> {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert a fresh session with its own empty cursor registry.
    pub fn create(&self, id: &str, profile: Profile, connection: Arc<C>) -> Arc<Session<C>> {
        let session = Arc::new(Session::new(id.to_string(), profile, connection));
        self.sessions.write().insert(id.to_string(), session.clone());
        session
    }

    /// Fetch a session and bump its idle clock.
    pub fn get(&self, id: &str) -> StateResult<Arc<Session<C>>> {
        let sessions = self.sessions.read();
        let session = sessions.get(id).ok_or(StateError::SessionNotFound)?;

        if session.idle_for() > self.ttl {
            return Err(StateError::SessionExpired);
        }

        session.touch();
        Ok(session.clone())
    }

    /// Remove a session, dropping its handle reference and destroying its
    /// cursor registry. Idempotent.
    pub fn delete(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            debug!("session {} deleted", id);
        }
    }

    /// Drop every session whose idle clock ran out. Called by the reaper.
    pub fn reap_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let live = session.idle_for() <= self.ttl;
            if !live {
                debug!("session {} expired after idling", id);
            }
            live
        });
        before - sessions.len()
    }

    /// Sweep the cursor registries of every live session. Called by the
    /// cursor reaper.
    pub fn reap_cursors(&self) -> usize {
        let sessions = self.sessions.read();
        sessions.values().map(|s| s.cursors.reap_expired()).sum()
    }

    /// Drop every session.
    pub fn close_all(&self) {
        self.sessions.write().clear();
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl<C> Default for SessionStore<C> {
    fn default() -> Self {
        Self::new()
    }
}
