use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::ArtistEntry;

/// The cached roster is fresh for 24 hours; after that a full reload runs.
const CACHE_FRESH_HOURS: i64 = 24;

/// File holding the roster record inside the cache directory.
const ROSTER_CACHE_FILE: &str = "roster.json";

/// The single persisted record: the whole roster plus its capture time.
/// Payload and timestamp live in one record so they can never go out of
/// step; a record missing either field fails to parse and reads as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRoster {
    pub entries: Vec<ArtistEntry>,
    pub cached_at: DateTime<Utc>,
}

impl CachedRoster {
    pub fn new(entries: Vec<ArtistEntry>) -> Self {
        Self {
            entries,
            cached_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.cached_at >= chrono::Duration::hours(CACHE_FRESH_HOURS)
    }

    pub fn age_display(&self) -> String {
        let minutes = (Utc::now() - self.cached_at).num_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn roster_path(&self) -> PathBuf {
        self.cache_dir.join(ROSTER_CACHE_FILE)
    }

    /// Read the cached roster if present and fresh. Corrupt or expired
    /// records are removed from disk and reported as absent.
    pub fn read(&self) -> Option<CachedRoster> {
        self.read_at(Utc::now())
    }

    fn read_at(&self, now: DateTime<Utc>) -> Option<CachedRoster> {
        let path = self.roster_path();
        if !path.exists() {
            return None;
        }

        let record = std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str::<CachedRoster>(&contents).ok());

        match record {
            Some(record) if !record.is_expired_at(now) => Some(record),
            Some(_) => {
                debug!("cached roster expired, discarding");
                Self::remove(&path);
                None
            }
            None => {
                warn!("cached roster unreadable, discarding");
                Self::remove(&path);
                None
            }
        }
    }

    fn remove(path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(error = %e, "failed to remove invalid cache file");
        }
    }

    /// Persist the merged roster, replacing any prior record. The caller
    /// logs and ignores a failure: the in-memory roster stays valid
    /// whether or not the write lands.
    pub fn write(&self, entries: &[ArtistEntry]) -> Result<()> {
        let record = CachedRoster::new(entries.to_vec());
        let contents = serde_json::to_string(&record)?;
        std::fs::write(self.roster_path(), contents)
            .with_context(|| format!("failed to write {}", self.roster_path().display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListenerCount;
    use chrono::Duration;
    use tempfile::tempdir;

    fn entry(name: &str, listeners: u64) -> ArtistEntry {
        ArtistEntry {
            name: name.to_string(),
            source_url: format!("https://open.spotify.com/artist/{}", name),
            listeners: ListenerCount::Count(listeners),
            last_update_display: "01/08/2026".to_string(),
            is_current: false,
        }
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        let entries = vec![entry("Alice", 100), entry("Bob", 200)];
        cache.write(&entries).unwrap();

        let record = cache.read().expect("fresh record should be present");
        assert_eq!(record.entries, entries);
    }

    #[test]
    fn test_read_missing_record_is_absent() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_expired_record_is_discarded_and_removed() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        cache.write(&[entry("Alice", 100)]).unwrap();

        // Fresh one millisecond before the window closes, absent one
        // millisecond after, and the file itself is gone afterwards.
        let written = cache.read().unwrap().cached_at;
        let just_before = written + Duration::hours(24) - Duration::milliseconds(1);
        assert!(cache.read_at(just_before).is_some());

        let just_after = written + Duration::hours(24) + Duration::milliseconds(1);
        assert!(cache.read_at(just_after).is_none());
        assert!(!dir.path().join(ROSTER_CACHE_FILE).exists());
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_corrupt_record_is_discarded_and_removed() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        std::fs::write(dir.path().join(ROSTER_CACHE_FILE), "{not json").unwrap();
        assert!(cache.read().is_none());
        assert!(!dir.path().join(ROSTER_CACHE_FILE).exists());
    }

    #[test]
    fn test_record_missing_timestamp_reads_as_absent() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        // Payload without its companion timestamp is not a valid record.
        std::fs::write(dir.path().join(ROSTER_CACHE_FILE), r#"{"entries":[]}"#).unwrap();
        assert!(cache.read().is_none());
        assert!(!dir.path().join(ROSTER_CACHE_FILE).exists());
    }

    #[test]
    fn test_write_replaces_prior_record() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        cache.write(&[entry("Alice", 100)]).unwrap();
        cache.write(&[entry("Bob", 200)]).unwrap();

        let record = cache.read().unwrap();
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.entries[0].name, "Bob");
    }
}
