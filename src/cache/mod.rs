//! Distribution caching
//!
//! Downloaded Gradle distributions are stored in a keyed blob cache so
//! later jobs can skip the network download.
//!
//! # Cache Behavior
//!
//! | Config | Restore | Save |
//! |--------|---------|------|
//! | disabled | no | no |
//! | read-only | yes | no |
//! | default | yes | on miss |
//!
//! Any cache error degrades to a direct download.

pub mod backend;
pub mod gateway;

pub use backend::{CacheEntry, DirectoryCache, DistributionCache};
pub use gateway::{cache_key, handle_cache_failure, CacheGateway};
