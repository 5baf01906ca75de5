//! Data models for the artist roster.
//!
//! - `ArtistRef`: minimal base-list record (name + source URL)
//! - `ArtistEntry`: fully-merged roster entry with listener status
//! - `ListenerCount`: listener figure or a loading/unavailable sentinel
//! - `History`, `HistoryPoint`: per-artist listener time series

pub mod artist;
pub mod history;

pub use artist::{ArtistEntry, ArtistRef, ListenerCount};
pub use history::{History, HistoryPoint, NEVER_UPDATED};
