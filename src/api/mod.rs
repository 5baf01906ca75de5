//! HTTP client module for the published dataset.
//!
//! The dataset is a static site: `artists.csv` holds the base list and each
//! artist has one `<sanitized-name>.csv` history file next to it. This
//! module provides the `DataClient` for fetching and decoding those files.

pub mod client;
pub mod error;

pub use client::{sanitize_file_name, DataClient};
pub use error::FetchError;
