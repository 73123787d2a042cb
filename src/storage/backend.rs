//! Cache backend abstraction.
//!
//! The cache is an explicit key-value store handed to each engine rather than
//! an ambient singleton. Keys are server names. Writers replace whatever was
//! stored before them.

use crate::domain::Result;
use crate::storage::models::CachedState;

/// Cross-instance store of grid state, keyed by server.
///
/// # Examples
///
/// ```
/// use jobgrid::storage::{CacheStore, CachedState, MemoryCache};
///
/// let cache = MemoryCache::new();
/// cache.put("prod-sql-01", CachedState::new("prod-sql-01"))?;
/// assert!(cache.get("prod-sql-01")?.is_some());
/// assert!(cache.get("other")?.is_none());
/// # Ok::<(), jobgrid::GridError>(())
/// ```
pub trait CacheStore: Send + Sync {
    /// Returns the state last stored for `server_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Cache`](crate::GridError::Cache) if the backend
    /// cannot be read.
    fn get(&self, server_key: &str) -> Result<Option<CachedState>>;

    /// Stores `state` for `server_key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Cache`](crate::GridError::Cache) if the backend
    /// cannot be written.
    fn put(&self, server_key: &str, state: CachedState) -> Result<()>;
}
