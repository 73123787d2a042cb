//! In-memory cache backend.

use crate::domain::{GridError, Result};
use crate::storage::backend::CacheStore;
use crate::storage::models::CachedState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to a process-wide map of cached states.
///
/// Clones share the same map, so a handle can be given to every view opened
/// during the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CachedState>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CachedState>>> {
        self.entries
            .lock()
            .map_err(|e| GridError::Cache(format!("cache lock poisoned: {e}")))
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, server_key: &str) -> Result<Option<CachedState>> {
        let state = self.lock()?.get(server_key).cloned();
        tracing::debug!(server_key, hit = state.is_some(), "cache lookup");
        Ok(state)
    }

    fn put(&self, server_key: &str, state: CachedState) -> Result<()> {
        tracing::debug!(server_key, rows = state.rows.len(), "cache write");
        self.lock()?.insert(server_key.to_string(), state);
        Ok(())
    }
}
