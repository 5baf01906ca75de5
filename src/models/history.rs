//! Per-artist listener history and the merge-time field derivation.

use chrono::NaiveDate;
use tracing::warn;

use crate::csv::Row;
use crate::models::ListenerCount;

/// Display marker for an artist whose history has never produced a dated
/// observation.
pub const NEVER_UPDATED: &str = "never";

/// One observation in an artist's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub listeners: u64,
}

/// Roster-facing fields derived from a history at merge time.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub listeners: ListenerCount,
    pub last_update_display: String,
    pub is_current: bool,
}

/// Parse a date cell. The updater writes ISO dates (YYYY-MM-DD); full
/// RFC 3339 timestamps are accepted as well.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Parse a listener cell, keeping digits only. The scraper occasionally
/// stores raw page text like "1 234 567 auditeurs mensuels".
pub fn parse_listeners(s: &str) -> u64 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// An artist's decoded history, sorted ascending by date. Source rows may
/// arrive in any order; rows without a parseable date or without both
/// expected columns are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub points: Vec<HistoryPoint>,
}

impl History {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut points: Vec<HistoryPoint> = rows
            .iter()
            .filter_map(|row| {
                let date_cell = row.get("date")?;
                let listeners_cell = row.get("auditeurs")?;
                match parse_date(date_cell) {
                    Some(date) => Some(HistoryPoint {
                        date,
                        listeners: parse_listeners(listeners_cell),
                    }),
                    None => {
                        warn!(date = %date_cell, "unparseable date in history row");
                        None
                    }
                }
            })
            .collect();
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Chronologically last observation.
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// Derive the roster-facing fields. `today` is passed in so the
    /// calendar comparison is deterministic under test.
    pub fn derive(&self, today: NaiveDate) -> DerivedFields {
        match self.latest() {
            Some(point) => DerivedFields {
                listeners: ListenerCount::Count(point.listeners),
                last_update_display: point.date.format("%d/%m/%Y").to_string(),
                is_current: point.date == today,
            },
            None => DerivedFields {
                listeners: ListenerCount::Unavailable,
                last_update_display: NEVER_UPDATED.to_string(),
                is_current: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::decode;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2026-08-06"), Some(date("2026-08-06")));
        assert_eq!(parse_date("2026-08-06T12:30:00+02:00"), Some(date("2026-08-06")));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_listeners_strips_non_digits() {
        assert_eq!(parse_listeners("1,234"), 1234);
        assert_eq!(parse_listeners("1 234 567 auditeurs mensuels"), 1234567);
        assert_eq!(parse_listeners("42"), 42);
        assert_eq!(parse_listeners("auditeurs"), 0);
    }

    #[test]
    fn test_from_rows_sorts_unordered_input() {
        let rows = decode("date,auditeurs\n2026-08-03,300\n2026-08-01,100\n2026-08-02,200");
        let history = History::from_rows(&rows);
        let dates: Vec<_> = history.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date("2026-08-01"), date("2026-08-02"), date("2026-08-03")]
        );
        assert_eq!(history.latest().unwrap().listeners, 300);
    }

    #[test]
    fn test_derive_current_when_latest_is_today() {
        let today = date("2026-08-06");
        let rows = decode("date,auditeurs\n2026-08-05,900\n2026-08-06,1.234");
        let derived = History::from_rows(&rows).derive(today);
        assert_eq!(derived.listeners, ListenerCount::Count(1234));
        assert!(derived.is_current);
        assert_eq!(derived.last_update_display, "06/08/2026");
    }

    #[test]
    fn test_derive_stale_when_latest_is_older() {
        let today = date("2026-08-06");
        let rows = decode("date,auditeurs\n2026-08-01,500");
        let derived = History::from_rows(&rows).derive(today);
        assert_eq!(derived.listeners, ListenerCount::Count(500));
        assert!(!derived.is_current);
        assert_eq!(derived.last_update_display, "01/08/2026");
    }

    #[test]
    fn test_derive_unavailable_for_empty_history() {
        let derived = History::default().derive(date("2026-08-06"));
        assert_eq!(derived.listeners, ListenerCount::Unavailable);
        assert_eq!(derived.last_update_display, NEVER_UPDATED);
        assert!(!derived.is_current);
    }

    #[test]
    fn test_derive_unavailable_when_no_date_parses() {
        let rows = decode("date,auditeurs\nsoon,100\nlater,200");
        let history = History::from_rows(&rows);
        assert!(history.is_empty());

        let derived = history.derive(date("2026-08-06"));
        assert_eq!(derived.listeners, ListenerCount::Unavailable);
    }

    #[test]
    fn test_rows_missing_columns_are_ignored() {
        let rows = decode("date,visites\n2026-08-01,100");
        assert!(History::from_rows(&rows).is_empty());
    }
}
