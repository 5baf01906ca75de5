//! Utility functions for string formatting, comparison and search scoring.

pub mod format;
pub mod search;

// Re-export commonly used functions at module level
pub use format::{group_thousands, truncate};
pub use search::{cmp_ignore_case, contains_ignore_case, relevance};
