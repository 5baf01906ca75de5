//! Application state management for Auditoire.
//!
//! The `App` struct owns the two pieces of shared mutable state - the
//! in-memory roster and the display limit - and is only ever mutated on
//! the main loop. Background load tasks communicate through an MPSC
//! channel drained once per tick, so a published roster is always a single
//! generation: cached, provisional, or merged, never a splice.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::DataClient;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::loader::{self, LoadPhase, LoadResult};
use crate::models::{ArtistEntry, HistoryPoint};
use crate::utils::{cmp_ignore_case, contains_ignore_case, relevance};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A load cycle sends at most a handful of messages; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of roster rows shown before the "show more" affordance kicks in.
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub client: DataClient,
    pub cache: CacheManager,

    // UI state
    pub state: AppState,
    pub search_query: String,
    pub display_limit: usize,
    pub roster_selection: usize,

    // Roster state
    pub roster: Vec<ArtistEntry>,
    pub load_phase: LoadPhase,
    /// A search happened while details were still loading; the view shows
    /// a waiting indicator until the merged roster arrives.
    pub search_waiting: bool,

    // Artist detail view
    pub viewing_artist: Option<String>,
    pub artist_history: Vec<HistoryPoint>,
    pub history_loaded: bool,

    // Background task channel
    load_rx: Option<mpsc::Receiver<LoadResult>>,
    load_tx: mpsc::Sender<LoadResult>,

    // Status bar
    pub status_message: Option<String>,
    pub cache_age: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        let cache = CacheManager::new(cache_dir)?;
        let client = DataClient::new(config.data_url())?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            client,
            cache,

            state: AppState::Normal,
            search_query: String::new(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
            roster_selection: 0,

            roster: Vec::new(),
            load_phase: LoadPhase::Partial,
            search_waiting: false,

            viewing_artist: None,
            artist_history: Vec::new(),
            history_loaded: false,

            load_rx: Some(rx),
            load_tx: tx,

            status_message: None,
            cache_age: None,
        })
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Start the initial load cycle: a fresh cache hit short-circuits to a
    /// ready roster, otherwise a background cycle is spawned.
    pub fn start_load(&mut self) {
        self.restore_persisted_query();

        if let Some(cached) = self.cache.read() {
            info!(count = cached.entries.len(), "roster loaded from cache");
            self.cache_age = Some(cached.age_display());
            self.roster = cached.entries;
            self.load_phase = LoadPhase::Cached;
            if !self.search_query.is_empty() {
                self.display_limit = self.roster.len();
            }
            return;
        }

        self.spawn_load_cycle();
        self.status_message = Some("Loading artists...".to_string());
    }

    /// Start a new load cycle, bypassing the cache. Refused while a cycle
    /// is in flight: cycles are never cancelled or overlapped.
    pub fn refresh(&mut self) {
        if !self.load_phase.is_terminal() {
            self.status_message = Some("Load already in progress...".to_string());
            return;
        }
        self.spawn_load_cycle();
        self.status_message = Some("Refreshing artists...".to_string());
    }

    fn spawn_load_cycle(&mut self) {
        self.load_phase = LoadPhase::Partial;
        let tx = self.load_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            loader::run(tx, client).await;
        });
    }

    /// Restore the persisted query the way the web version restores `?q=`:
    /// with a query active, every match is shown.
    fn restore_persisted_query(&mut self) {
        if let Some(q) = self.config.last_query.clone() {
            if !q.is_empty() {
                self.search_query = q;
            }
        }
    }

    /// Drain completed background work and fold it into the app state.
    pub fn check_background_tasks(&mut self) {
        let results: Vec<LoadResult> = {
            if let Some(ref mut rx) = self.load_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::BaseList(entries) => {
                self.roster = entries;
                self.load_phase = LoadPhase::Partial;
                if !self.search_query.is_empty() {
                    self.display_limit = self.roster.len();
                }
                self.clamp_selection();
                self.status_message = Some("Loading listener history...".to_string());
            }
            LoadResult::Merged(entries) => {
                self.roster = entries;
                self.load_phase = LoadPhase::Complete;
                self.search_waiting = false;
                if !self.search_query.is_empty() {
                    self.display_limit = self.roster.len();
                }
                self.clamp_selection();
                self.status_message = None;

                if let Err(e) = self.cache.write(&self.roster) {
                    warn!(error = %e, "Failed to persist roster cache");
                } else {
                    self.cache_age = Some("just now".to_string());
                }
            }
            LoadResult::History(name, points) => {
                // Ignore late results for a detail view we already left.
                if self.viewing_artist.as_deref() == Some(name.as_str()) {
                    self.artist_history = points;
                    self.history_loaded = true;
                }
            }
        }
    }

    // =========================================================================
    // Roster selection for display
    // =========================================================================

    /// Filtered and sorted roster for the current query.
    pub fn filtered_sorted(&self) -> Vec<&ArtistEntry> {
        filter_and_sort(&self.roster, self.search_query.trim())
    }

    /// The rows actually shown, plus whether the "show more" affordance
    /// applies (only when no search is active and rows were cut off).
    pub fn visible_artists(&self) -> (Vec<&ArtistEntry>, bool) {
        visible(&self.roster, self.search_query.trim(), self.display_limit)
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Apply a changed search query: a non-empty query shows every match
    /// and is persisted; clearing it resets the page size and removes the
    /// persisted query. A search during a partial load surfaces a waiting
    /// indicator until the merged roster lands.
    pub fn update_query(&mut self, query: String) {
        self.search_query = query;
        let trimmed = self.search_query.trim();

        if trimmed.is_empty() {
            self.display_limit = DEFAULT_DISPLAY_LIMIT;
            self.config.last_query = None;
        } else {
            self.display_limit = self.roster.len();
            self.config.last_query = Some(trimmed.to_string());
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        if self.load_phase == LoadPhase::Partial {
            self.search_waiting = true;
        }
        self.roster_selection = 0;
    }

    /// The "show more" affordance: display everything, query untouched.
    pub fn show_all(&mut self) {
        self.display_limit = self.roster.len();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_artists().0.len();
        if self.roster_selection >= len {
            self.roster_selection = len.saturating_sub(1);
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_artists().0.len();
        if len == 0 {
            self.roster_selection = 0;
            return;
        }
        let current = self.roster_selection as isize;
        self.roster_selection = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn select_last(&mut self) {
        let len = self.visible_artists().0.len();
        self.roster_selection = len.saturating_sub(1);
    }

    // =========================================================================
    // Artist detail view
    // =========================================================================

    /// Open the history view for the selected artist and fetch its points
    /// in the background.
    pub fn open_artist_detail(&mut self) {
        let name = match self.visible_artists().0.get(self.roster_selection) {
            Some(artist) => artist.name.clone(),
            None => return,
        };

        self.viewing_artist = Some(name.clone());
        self.artist_history = Vec::new();
        self.history_loaded = false;

        let tx = self.load_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            loader::fetch_history(tx, client, name).await;
        });
    }

    pub fn close_artist_detail(&mut self) {
        self.viewing_artist = None;
        self.artist_history.clear();
        self.history_loaded = false;
    }

    /// The roster entry for the artist currently shown in the detail view.
    pub fn viewed_entry(&self) -> Option<&ArtistEntry> {
        let name = self.viewing_artist.as_deref()?;
        self.roster.iter().find(|a| a.name == name)
    }
}

// ============================================================================
// Roster view selection (pure)
// ============================================================================

/// Filter the roster by case-insensitive substring match on the name, then
/// sort: relevance first, numeric listeners second (sentinels order as
/// zero), name last. The displayed listener value is never touched.
pub fn filter_and_sort<'a>(roster: &'a [ArtistEntry], query: &str) -> Vec<&'a ArtistEntry> {
    let mut entries: Vec<&ArtistEntry> = roster
        .iter()
        .filter(|a| !a.name.is_empty() && contains_ignore_case(&a.name, query))
        .collect();

    entries.sort_by(|a, b| {
        let score_a = relevance(&a.name, query);
        let score_b = relevance(&b.name, query);
        score_b
            .cmp(&score_a)
            .then_with(|| b.listeners.sort_key().cmp(&a.listeners.sort_key()))
            .then_with(|| cmp_ignore_case(&a.name, &b.name))
    });

    entries
}

/// Cut the filtered roster down to `display_limit` rows when no search is
/// active. Returns the rows to show and whether more rows were hidden.
pub fn visible<'a>(
    roster: &'a [ArtistEntry],
    query: &str,
    display_limit: usize,
) -> (Vec<&'a ArtistEntry>, bool) {
    let mut filtered = filter_and_sort(roster, query);
    if query.is_empty() && filtered.len() > display_limit {
        filtered.truncate(display_limit);
        (filtered, true)
    } else {
        (filtered, false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListenerCount;

    fn entry(name: &str, listeners: ListenerCount) -> ArtistEntry {
        ArtistEntry {
            name: name.to_string(),
            source_url: String::new(),
            listeners,
            last_update_display: "01/08/2026".to_string(),
            is_current: false,
        }
    }

    fn counted(name: &str, listeners: u64) -> ArtistEntry {
        entry(name, ListenerCount::Count(listeners))
    }

    #[test]
    fn test_filter_by_relevance_order() {
        let roster = vec![counted("Alice", 10), counted("Malik", 99), counted("Bob", 50)];
        let names: Vec<_> = filter_and_sort(&roster, "ali")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        // Alice scores 2 (prefix), Malik 1 (substring), Bob is filtered out.
        assert_eq!(names, vec!["Alice", "Malik"]);
    }

    #[test]
    fn test_equal_relevance_sorts_by_listeners_desc() {
        let roster = vec![counted("Aa", 10), counted("Ab", 500), counted("Ac", 100)];
        let names: Vec<_> = filter_and_sort(&roster, "")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ab", "Ac", "Aa"]);
    }

    #[test]
    fn test_equal_listeners_sorts_by_name_asc() {
        let roster = vec![counted("zeta", 100), counted("Beta", 100), counted("alpha", 100)];
        let names: Vec<_> = filter_and_sort(&roster, "")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "Beta", "zeta"]);
    }

    #[test]
    fn test_sentinels_order_as_zero_without_changing_display() {
        let roster = vec![
            entry("Pending", ListenerCount::Loading),
            counted("Known", 5),
            entry("Missing", ListenerCount::Unavailable),
        ];
        let sorted = filter_and_sort(&roster, "");
        assert_eq!(sorted[0].name, "Known");
        // Sentinels tie at zero and fall back to the name order.
        assert_eq!(sorted[1].name, "Missing");
        assert_eq!(sorted[2].name, "Pending");
        assert_eq!(sorted[1].listeners.to_string(), "n/a");
        assert_eq!(sorted[2].listeners.to_string(), "loading...");
    }

    #[test]
    fn test_visible_truncates_only_without_query() {
        let roster: Vec<ArtistEntry> = (0..80).map(|i| counted(&format!("a{:02}", i), i)).collect();

        let (shown, more) = visible(&roster, "", 50);
        assert_eq!(shown.len(), 50);
        assert!(more);

        // The cut happens after sorting: top listener counts survive.
        assert_eq!(shown[0].listeners, ListenerCount::Count(79));

        let (shown, more) = visible(&roster, "a", 50);
        assert_eq!(shown.len(), 80);
        assert!(!more);

        let (shown, more) = visible(&roster, "", 100);
        assert_eq!(shown.len(), 80);
        assert!(!more);
    }

    #[test]
    fn test_visible_empty_filter_result() {
        let roster = vec![counted("Alice", 10)];
        let (shown, more) = visible(&roster, "zzz", 50);
        assert!(shown.is_empty());
        assert!(!more);
    }
}
