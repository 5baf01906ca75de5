//! Client for fetching the static dataset files.
//!
//! Fetches fail soft: any transport or HTTP error decodes to an empty row
//! set, so one missing or broken file never takes down a load cycle. Only
//! the log level distinguishes a missing file from a real failure.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::csv::{self, Row};
use crate::models::ArtistRef;

use super::FetchError;

/// HTTP request timeout in seconds.
/// 30s tolerates a slow static host while still failing fast enough.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Base-list file name under the dataset base URL.
const ROSTER_INDEX_FILE: &str = "artists.csv";

/// Derive an artist's history file name from its display name. Strips the
/// same characters the updater strips; the two must agree exactly.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Client for the dataset host.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status(), url));
        }
        Ok(response.text().await?)
    }

    /// Fetch and decode one tabular file. Failures yield an empty row set;
    /// a missing file is only worth a warning since new artists have no
    /// history yet.
    pub async fn fetch_rows(&self, file: &str) -> Vec<Row> {
        let url = format!("{}/{}", self.base_url, file);
        match self.fetch_text(&url).await {
            Ok(text) => csv::decode(&text),
            Err(e) if e.is_not_found() => {
                warn!(url = %url, "file not found, treating as empty");
                Vec::new()
            }
            Err(e) => {
                error!(url = %url, error = %e, "fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Fetch the base list in file order. Rows without a name are skipped.
    pub async fn fetch_roster_index(&self) -> Vec<ArtistRef> {
        let rows = self.fetch_rows(ROSTER_INDEX_FILE).await;
        rows.iter()
            .filter_map(|row| {
                let name = row.get("nom").map(String::as_str).unwrap_or("");
                if name.is_empty() {
                    warn!("base list row without a name, skipping");
                    return None;
                }
                Some(ArtistRef {
                    name: name.to_string(),
                    source_url: row.get("url").cloned().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Fetch one artist's history rows.
    pub async fn fetch_history(&self, artist_name: &str) -> Vec<Row> {
        let file = format!("{}.csv", sanitize_file_name(artist_name));
        debug!(artist = %artist_name, file = %file, "fetching history");
        self.fetch_rows(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_reserved_characters() {
        assert_eq!(sanitize_file_name(r#"AC/DC"#), "ACDC");
        assert_eq!(sanitize_file_name(r#"What? <No*pe>: "x"|y\z"#), "What Nope xyz");
        assert_eq!(sanitize_file_name("  Daft Punk  "), "Daft Punk");
        assert_eq!(sanitize_file_name("Stromae"), "Stromae");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = DataClient::new("http://localhost:8000/data///").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/data");
    }
}
