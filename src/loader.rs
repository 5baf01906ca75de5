//! Progressive roster loading.
//!
//! A load cycle either short-circuits on a fresh cache hit (handled by the
//! app before anything is spawned) or runs as a background task: fetch the
//! base list, publish a provisional roster so the table renders
//! immediately, fan out one history fetch per artist, and publish the
//! merged roster as a single batch once every derivation has finished.
//! One artist's failure never aborts the others; its entry simply merges
//! as unavailable. Cycles are never cancelled - they run to completion and
//! the merged publish doubles as the completion signal.

use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::DataClient;
use crate::models::{ArtistEntry, ArtistRef, History, HistoryPoint};

/// Maximum concurrent history fetches.
/// Static hosts handle this comfortably and it keeps socket use bounded.
const MAX_CONCURRENT_FETCHES: usize = 10;

/// Where the roster currently comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Fresh cache hit; the roster is complete and no fetches run.
    Cached,
    /// Base list published, listener histories still loading.
    Partial,
    /// Every history has been merged and the cache rewritten.
    Complete,
}

impl LoadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadPhase::Cached | LoadPhase::Complete)
    }
}

/// Messages from background tasks to the app.
pub enum LoadResult {
    /// Provisional roster in base-list order, every entry still loading.
    BaseList(Vec<ArtistEntry>),
    /// Fully merged roster; the completion signal for this cycle.
    Merged(Vec<ArtistEntry>),
    /// History points for one artist, for the detail chart.
    History(String, Vec<HistoryPoint>),
}

/// Run one load cycle against the dataset host.
pub async fn run(tx: mpsc::Sender<LoadResult>, client: DataClient) {
    info!("load cycle started");
    let base = client.fetch_roster_index().await;

    if base.is_empty() {
        warn!("base list empty or unavailable");
        send(&tx, LoadResult::Merged(Vec::new())).await;
        return;
    }

    let provisional: Vec<ArtistEntry> = base.iter().cloned().map(ArtistEntry::pending).collect();
    send(&tx, LoadResult::BaseList(provisional)).await;

    // Fan out the history fetches. `buffered` bounds concurrency while
    // preserving base-list order, so the merged roster lines up with the
    // index without re-sorting, and `collect` is the single join point.
    let today = Local::now().date_naive();
    let merged: Vec<ArtistEntry> = stream::iter(base)
        .map(|artist| {
            let client = client.clone();
            async move {
                let rows = client.fetch_history(&artist.name).await;
                let history = History::from_rows(&rows);
                merge_entry(artist, &history, today)
            }
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    info!(count = merged.len(), "load cycle complete");
    send(&tx, LoadResult::Merged(merged)).await;
}

/// Build the final entry for one artist from its decoded history.
fn merge_entry(base: ArtistRef, history: &History, today: NaiveDate) -> ArtistEntry {
    let derived = history.derive(today);
    ArtistEntry {
        name: base.name,
        source_url: base.source_url,
        listeners: derived.listeners,
        last_update_display: derived.last_update_display,
        is_current: derived.is_current,
    }
}

/// Fetch one artist's history for the detail view.
pub async fn fetch_history(tx: mpsc::Sender<LoadResult>, client: DataClient, name: String) {
    let rows = client.fetch_history(&name).await;
    let history = History::from_rows(&rows);
    send(&tx, LoadResult::History(name, history.points)).await;
}

async fn send(tx: &mpsc::Sender<LoadResult>, result: LoadResult) {
    if tx.send(result).await.is_err() {
        warn!("load channel closed, dropping result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::decode;
    use crate::models::{ListenerCount, NEVER_UPDATED};

    fn artist(name: &str) -> ArtistRef {
        ArtistRef {
            name: name.to_string(),
            source_url: format!("https://open.spotify.com/artist/{}", name),
        }
    }

    #[test]
    fn test_one_broken_history_does_not_affect_the_others() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let alice = History::from_rows(&decode("date,auditeurs\n2026-08-06,1.234"));
        // Bob's file is missing: the fail-soft fetch yields no rows.
        let bob = History::from_rows(&[]);
        let carol = History::from_rows(&decode("date,auditeurs\n2026-08-01,500"));

        let merged = [
            merge_entry(artist("Alice"), &alice, today),
            merge_entry(artist("Bob"), &bob, today),
            merge_entry(artist("Carol"), &carol, today),
        ];

        assert_eq!(merged[0].listeners, ListenerCount::Count(1234));
        assert!(merged[0].is_current);

        assert_eq!(merged[1].listeners, ListenerCount::Unavailable);
        assert_eq!(merged[1].last_update_display, NEVER_UPDATED);
        assert!(!merged[1].is_current);

        assert_eq!(merged[2].listeners, ListenerCount::Count(500));
        assert!(!merged[2].is_current);
    }

    #[tokio::test]
    async fn test_unreachable_host_short_circuits_to_empty_complete() {
        // Port 1 refuses connections, so the base list fetch fails soft
        // and the cycle publishes an empty merged roster immediately.
        let client = DataClient::new("http://127.0.0.1:1/data").unwrap();
        let (tx, mut rx) = mpsc::channel(8);

        run(tx, client).await;

        match rx.recv().await {
            Some(LoadResult::Merged(entries)) => assert!(entries.is_empty()),
            _ => panic!("expected a merged publish"),
        }
        assert!(rx.recv().await.is_none());
    }
}
