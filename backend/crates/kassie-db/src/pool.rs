// Connection pool: one live driver handle per profile name
//
// Handle creation runs under the pool lock on purpose: a login storm on one
// profile serializes into a single driver construction and every other caller
// receives the shared handle. Handles are internally concurrent, so pinning
// one per profile amortizes TLS and topology discovery across all sessions.

use crate::error::{DbError, DbResult};
use log::{debug, info};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Contract a pooled handle must satisfy: report liveness and accept a
/// close marker when the pool evicts it.
pub trait PoolEntry: Send + Sync {
    fn is_closed(&self) -> bool;
    fn close(&self);
}

struct PoolInner<H> {
    connections: HashMap<String, Arc<H>>,
    closed: bool,
}

/// Profile-keyed pool of shared driver handles.
pub struct Pool<H: PoolEntry> {
    inner: Mutex<PoolInner<H>>,
}

impl<H: PoolEntry> Pool<H> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PoolInner {
                connections: HashMap::new(),
                closed: false,
            }),
        }
    }

    /// Return the live handle for `profile_name`, creating one with `create`
    /// if none exists or the existing entry was marked closed.
    ///
    /// At most one creation runs at a time; concurrent callers for the same
    /// profile wait and then reuse the freshly created handle. Pure reuse
    /// never fails.
    pub async fn get_or_create<F, Fut>(&self, profile_name: &str, create: F) -> DbResult<Arc<H>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DbResult<H>>,
    {
        let mut inner = self.inner.lock().await;

        if inner.closed {
            return Err(DbError::PoolClosed);
        }

        if let Some(handle) = inner.connections.get(profile_name) {
            if !handle.is_closed() {
                debug!("reusing pooled connection for profile {}", profile_name);
                return Ok(handle.clone());
            }
            // Stale entry: discard and fall through to recreation.
            inner.connections.remove(profile_name);
        }

        info!("creating connection for profile {}", profile_name);
        let handle = Arc::new(create().await?);
        inner.connections.insert(profile_name.to_string(), handle.clone());

        Ok(handle)
    }

    /// Return the existing live handle for `profile_name`.
    pub async fn get(&self, profile_name: &str) -> DbResult<Arc<H>> {
        let inner = self.inner.lock().await;

        if inner.closed {
            return Err(DbError::PoolClosed);
        }

        let handle = inner
            .connections
            .get(profile_name)
            .ok_or_else(|| DbError::NotFound(profile_name.to_string()))?;

        if handle.is_closed() {
            return Err(DbError::HandleClosed(profile_name.to_string()));
        }

        Ok(handle.clone())
    }

    /// Close and remove one profile's handle. Idempotent.
    pub async fn close(&self, profile_name: &str) {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = inner.connections.remove(profile_name) {
            handle.close();
        }
    }

    /// Close every handle and mark the pool permanently closed; subsequent
    /// `get`/`get_or_create` calls fail with `PoolClosed`.
    pub async fn close_all(&self) {
        let mut inner = self.inner.lock().await;
        for (name, handle) in inner.connections.drain() {
            debug!("closing pooled connection for profile {}", name);
            handle.close();
        }
        inner.closed = true;
    }

    /// Names of the profiles currently holding a pooled handle.
    pub async fn profile_names(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.connections.keys().cloned().collect()
    }
}

impl<H: PoolEntry> Default for Pool<H> {
    fn default() -> Self {
        Self::new()
    }
}
