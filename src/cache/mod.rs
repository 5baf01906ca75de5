//! Local roster caching for instant startup and offline use.
//!
//! The fully-merged roster is persisted as a single JSON record together
//! with its capture timestamp, and is considered fresh for 24 hours.
//! Expired or unreadable records are discarded, never repaired.

pub mod manager;

pub use manager::{CacheManager, CachedRoster};
