//! Shared types used across all Tagnet crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized string label attached to a company.
///
/// Uniqueness is case- and whitespace-sensitive: no stemming, no synonym
/// folding. Tags are immutable once parsed.
pub type Tag = String;

/// Index of a detected community.
///
/// Ids are canonicalized after detection (largest community first, ties by
/// smallest member tag) so they are comparable across runs.
pub type CommunityId = usize;

/// Group id used when a rendered node has no community assignment.
pub const UNASSIGNED_GROUP: i64 = -1;

/// An unordered pair of distinct tags in canonical order (`first < second`).
///
/// The canonical ordering is what keeps `(a, b)` and `(b, a)` from being
/// counted as two different pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagPair {
    first: Tag,
    second: Tag,
}

impl TagPair {
    /// Build a canonical pair. Returns `None` when both tags are equal —
    /// a tag never co-occurs with itself.
    pub fn new(a: impl Into<Tag>, b: impl Into<Tag>) -> Option<Self> {
        let a = a.into();
        let b = b.into();
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for TagPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// A co-occurrence edge: two tags and the number of distinct companies in
/// which they appear together. Present edges always have `weight >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoEdge {
    pub tag1: Tag,
    pub tag2: Tag,
    pub weight: u32,
}

impl CoEdge {
    pub fn new(pair: &TagPair, weight: u32) -> Self {
        Self {
            tag1: pair.first().to_string(),
            tag2: pair.second().to_string(),
            weight,
        }
    }
}
