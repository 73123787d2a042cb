//! Cross-instance grid cache.
//!
//! A view reads the cache when it is constructed and writes it when it is
//! torn down, so reopening the job list on the same server shows the last
//! known rows without waiting for the provider.
//!
//! # Modules
//!
//! - `backend`: [`CacheStore`] trait
//! - `memory`: shared in-memory implementation
//! - `models`: [`CachedState`] record

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::CacheStore;
pub use memory::MemoryCache;
pub use models::CachedState;
