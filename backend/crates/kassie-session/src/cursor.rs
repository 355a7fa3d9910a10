// Per-session cursor registry
//
// A cursor holds the opaque driver paging token for one active scan. Clients
// only ever see the server-minted id; losing it simply means starting a new
// scan. Cursors are strictly single-consumer: GetNextPage deletes the cursor
// it consumed and mints a successor when more pages remain, so the id a
// client holds is valid for exactly one fetch.

use crate::error::{StateError, StateResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cursors idle longer than this are evicted.
pub const CURSOR_TTL: Duration = Duration::from_secs(30 * 60);

/// Pagination state for one active scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub id: String,
    pub page_state: Vec<u8>,
    pub keyspace: String,
    pub table: String,
    pub filter: String,
    pub page_size: i32,
    pub created_at: Instant,
    pub last_used: Instant,
}

/// Registry of one session's cursors.
pub struct CursorStore {
    cursors: RwLock<HashMap<String, Cursor>>,
    ttl: Duration,
}

impl CursorStore {
    pub fn new() -> Self {
        Self::with_ttl(CURSOR_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cursors: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store pagination state under a fresh random id.
    pub fn create(
        &self,
        page_state: Vec<u8>,
        keyspace: &str,
        table: &str,
        filter: &str,
        page_size: i32,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();

        let cursor = Cursor {
            id: id.clone(),
            page_state,
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            filter: filter.to_string(),
            page_size,
            created_at: now,
            last_used: now,
        };

        self.cursors.write().insert(id.clone(), cursor);
        id
    }

    /// Fetch a cursor and bump its idle clock.
    pub fn get(&self, id: &str) -> StateResult<Cursor> {
        let mut cursors = self.cursors.write();
        let cursor = cursors.get_mut(id).ok_or(StateError::CursorNotFound)?;

        if cursor.last_used.elapsed() > self.ttl {
            return Err(StateError::CursorExpired);
        }

        cursor.last_used = Instant::now();
        Ok(cursor.clone())
    }

    /// Remove a cursor. Idempotent.
    pub fn delete(&self, id: &str) {
        self.cursors.write().remove(id);
    }

    /// Drop every cursor whose idle clock ran out. Called by the reaper.
    pub fn reap_expired(&self) -> usize {
        let mut cursors = self.cursors.write();
        let before = cursors.len();
        cursors.retain(|_, cursor| cursor.last_used.elapsed() <= self.ttl);
        before - cursors.len()
    }

    pub fn count(&self) -> usize {
        self.cursors.read().len()
    }
}

impl Default for CursorStore {
    fn default() -> Self {
        Self::new()
    }
}
