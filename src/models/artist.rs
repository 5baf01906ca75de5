//! Roster entry types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::group_thousands;

/// Minimal per-artist record from the base list, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    pub source_url: String,
}

/// Monthly listener figure for an artist, or a placeholder while the
/// history is loading or missing. Sentinels order as zero for sorting but
/// keep their own display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerCount {
    Count(u64),
    Loading,
    Unavailable,
}

impl ListenerCount {
    /// Sort key only; the displayed value is never collapsed to zero.
    pub fn sort_key(&self) -> u64 {
        match self {
            ListenerCount::Count(n) => *n,
            ListenerCount::Loading | ListenerCount::Unavailable => 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListenerCount::Loading)
    }
}

impl fmt::Display for ListenerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerCount::Count(n) => write!(f, "{}", group_thousands(*n)),
            ListenerCount::Loading => write!(f, "loading..."),
            ListenerCount::Unavailable => write!(f, "n/a"),
        }
    }
}

/// One roster entry. Entries are only ever replaced wholesale when a load
/// cycle publishes a new roster generation; nothing mutates them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistEntry {
    pub name: String,
    pub source_url: String,
    pub listeners: ListenerCount,
    pub last_update_display: String,
    pub is_current: bool,
}

impl ArtistEntry {
    /// Provisional entry shown while the artist's history is being fetched.
    pub fn pending(base: ArtistRef) -> Self {
        Self {
            name: base.name,
            source_url: base.source_url,
            listeners: ListenerCount::Loading,
            last_update_display: "...".to_string(),
            is_current: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_sort_as_zero_but_display_verbatim() {
        assert_eq!(ListenerCount::Loading.sort_key(), 0);
        assert_eq!(ListenerCount::Unavailable.sort_key(), 0);
        assert_eq!(ListenerCount::Count(1234).sort_key(), 1234);

        assert_eq!(ListenerCount::Loading.to_string(), "loading...");
        assert_eq!(ListenerCount::Unavailable.to_string(), "n/a");
        assert_eq!(ListenerCount::Count(1234).to_string(), "1 234");
    }

    #[test]
    fn test_listener_count_serde_round_trip() {
        for value in [
            ListenerCount::Count(42),
            ListenerCount::Loading,
            ListenerCount::Unavailable,
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: ListenerCount = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_pending_entry() {
        let entry = ArtistEntry::pending(ArtistRef {
            name: "Alice".to_string(),
            source_url: "a".to_string(),
        });
        assert!(entry.listeners.is_loading());
        assert!(!entry.is_current);
    }
}
