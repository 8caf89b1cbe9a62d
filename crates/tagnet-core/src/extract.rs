//! Tag extraction — parse a raw tag field into a list of normalized tags.
//!
//! Splitting is on commas; each piece is trimmed, empty pieces are dropped,
//! and tags in the configured blocklist are removed. A missing or empty
//! field yields an empty list, never an error.

use crate::types::Tag;
use std::collections::HashSet;

/// Business-form tags excluded by default. They attach to almost every
/// company and would dominate the co-occurrence network without carrying
/// any thematic signal.
pub const DEFAULT_BLOCKLIST: &[&str] = &["B2B", "BtoB", "B2C", "BtoC", "CtoC", "D2C"];

/// Parses raw tag fields into normalized tag lists.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    blocklist: HashSet<String>,
}

impl TagExtractor {
    /// An extractor with no blocklist.
    pub fn new() -> Self {
        Self {
            blocklist: HashSet::new(),
        }
    }

    /// An extractor dropping the default business-form tags.
    pub fn with_default_blocklist() -> Self {
        Self::with_blocklist(DEFAULT_BLOCKLIST.iter().map(|t| t.to_string()))
    }

    pub fn with_blocklist(blocklist: impl IntoIterator<Item = String>) -> Self {
        Self {
            blocklist: blocklist.into_iter().collect(),
        }
    }

    /// Extract tags from a raw field value. Duplicates within the field are
    /// preserved here; deduplication happens per company when counting
    /// co-occurrences.
    pub fn extract(&self, raw: Option<&str>) -> Vec<Tag> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter(|t| !self.blocklist.contains(*t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_empties() {
        let ex = TagExtractor::new();
        assert_eq!(
            ex.extract(Some(" AI , SaaS ,, FinTech ,")),
            vec!["AI", "SaaS", "FinTech"]
        );
    }

    #[test]
    fn missing_field_yields_empty_list() {
        let ex = TagExtractor::new();
        assert!(ex.extract(None).is_empty());
        assert!(ex.extract(Some("")).is_empty());
        assert!(ex.extract(Some("  ,  ,")).is_empty());
    }

    #[test]
    fn blocklisted_tags_are_removed() {
        let ex = TagExtractor::with_default_blocklist();
        assert_eq!(ex.extract(Some("B2B, AI, BtoC, SaaS")), vec!["AI", "SaaS"]);
    }

    #[test]
    fn duplicates_survive_extraction() {
        // Dedup is the counter's job, not the extractor's.
        let ex = TagExtractor::new();
        assert_eq!(ex.extract(Some("x, x, y")), vec!["x", "x", "y"]);
    }
}
