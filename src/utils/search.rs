//! Search relevance scoring and case-insensitive string helpers.

use std::cmp::Ordering;

/// Score how well an artist name matches a search query.
///
/// Returns 3 for an exact match, 2 for a prefix match, 1 for a substring
/// match anywhere else, and 0 for an empty query or no match. Comparison
/// is case-insensitive.
pub fn relevance(name: &str, query: &str) -> u8 {
    if query.is_empty() {
        return 0;
    }
    let name = name.to_lowercase();
    let query = query.to_lowercase();

    if name == query {
        3
    } else if name.starts_with(&query) {
        2
    } else if name.contains(&query) {
        1
    } else {
        0
    }
}

/// Case-insensitive substring check. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive comparison without allocating.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_empty_query_scores_zero() {
        assert_eq!(relevance("Alice", ""), 0);
        assert_eq!(relevance("", ""), 0);
    }

    #[test]
    fn test_relevance_exact_match() {
        assert_eq!(relevance("Alice", "Alice"), 3);
        assert_eq!(relevance("Alice", "alice"), 3);
        assert_eq!(relevance("ALICE", "alice"), 3);
    }

    #[test]
    fn test_relevance_prefix_and_substring() {
        assert_eq!(relevance("Alice", "ali"), 2);
        assert_eq!(relevance("Malik", "ali"), 1);
        assert_eq!(relevance("Bob", "ali"), 0);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Daft Punk", "punk"));
        assert!(contains_ignore_case("Daft Punk", ""));
        assert!(!contains_ignore_case("Daft Punk", "disco"));
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("alice", "Alice"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("Alice", "bob"), Ordering::Less);
        assert_eq!(cmp_ignore_case("malik", "Alice"), Ordering::Greater);
    }
}
