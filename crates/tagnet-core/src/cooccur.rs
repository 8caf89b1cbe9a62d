//! Co-occurrence counting — fold company tag sets into a pair → weight table.
//!
//! For each company the set of *unique* tags is taken (duplicates within one
//! company must not inflate counts), every unordered 2-combination is formed
//! and the canonical pair's counter is incremented. The table is sparse:
//! pairs that never co-occur are simply absent.

use crate::types::{CoEdge, Tag, TagPair};
use std::collections::{BTreeMap, BTreeSet};

/// Sparse pair → weight table accumulated over all companies.
///
/// Counts are commutative and associative, so the iteration order over
/// companies never affects the final weights.
#[derive(Debug, Clone, Default)]
pub struct CoOccurrence {
    counts: BTreeMap<TagPair, u32>,
}

impl CoOccurrence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold all company tag lists into one table.
    pub fn from_companies<L: AsRef<[Tag]>>(companies: impl IntoIterator<Item = L>) -> Self {
        companies
            .into_iter()
            .fold(Self::new(), |mut acc, tags| {
                acc.add_company(tags.as_ref());
                acc
            })
    }

    /// Count one company's contribution: each unordered pair of its unique
    /// tags gains weight 1. Companies with 0 or 1 tag contribute nothing.
    pub fn add_company(&mut self, tags: &[Tag]) {
        let unique: BTreeSet<&Tag> = tags.iter().collect();
        let unique: Vec<&Tag> = unique.into_iter().collect();
        for i in 0..unique.len() {
            for j in (i + 1)..unique.len() {
                // unique is sorted, so the pair is already canonical
                let pair = TagPair::new(unique[i].clone(), unique[j].clone())
                    .expect("distinct tags form a valid pair");
                *self.counts.entry(pair).or_insert(0) += 1;
            }
        }
    }

    /// Weight of a specific pair, 0 when the tags never co-occurred.
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        TagPair::new(a, b)
            .and_then(|p| self.counts.get(&p).copied())
            .unwrap_or(0)
    }

    /// Number of distinct co-occurring pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All edges, sorted by descending weight (ties by pair order). The sort
    /// is for reporting only; weights carry the semantics.
    pub fn edges(&self) -> Vec<CoEdge> {
        let mut edges: Vec<CoEdge> = self
            .counts
            .iter()
            .map(|(pair, &weight)| CoEdge::new(pair, weight))
            .collect();
        edges.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then_with(|| a.tag1.cmp(&b.tag1))
                .then_with(|| a.tag2.cmp(&b.tag2))
        });
        edges
    }
}

/// Keep only edges with `weight >= min_weight`. Filtering removes edges
/// (and with them, nodes); it can never introduce anything new.
pub fn threshold_edges(edges: &[CoEdge], min_weight: u32) -> Vec<CoEdge> {
    edges
        .iter()
        .filter(|e| e.weight >= min_weight)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<Tag> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_distinct_companies_per_pair() {
        // X:[a,b], Y:[a,b,c], Z:[b,c] → (a,b)=2, (a,c)=1, (b,c)=2
        let companies = vec![tags(&["a", "b"]), tags(&["a", "b", "c"]), tags(&["b", "c"])];
        let co = CoOccurrence::from_companies(&companies);
        assert_eq!(co.weight("a", "b"), 2);
        assert_eq!(co.weight("a", "c"), 1);
        assert_eq!(co.weight("b", "c"), 2);
        assert_eq!(co.len(), 3);
    }

    #[test]
    fn duplicates_within_a_company_count_once() {
        let companies = vec![tags(&["x", "x", "y"])];
        let co = CoOccurrence::from_companies(&companies);
        assert_eq!(co.weight("x", "y"), 1);
        assert_eq!(co.len(), 1);
    }

    #[test]
    fn small_companies_contribute_nothing() {
        let companies = vec![tags(&[]), tags(&["solo"])];
        let co = CoOccurrence::from_companies(&companies);
        assert!(co.is_empty());
    }

    #[test]
    fn company_order_does_not_matter() {
        let a = vec![tags(&["a", "b"]), tags(&["b", "c"])];
        let b = vec![tags(&["b", "c"]), tags(&["a", "b"])];
        let co_a = CoOccurrence::from_companies(&a);
        let co_b = CoOccurrence::from_companies(&b);
        assert_eq!(co_a.edges(), co_b.edges());
    }

    #[test]
    fn edges_sorted_by_descending_weight() {
        let companies = vec![
            tags(&["a", "b"]),
            tags(&["a", "b"]),
            tags(&["a", "c"]),
        ];
        let edges = CoOccurrence::from_companies(&companies).edges();
        assert_eq!(edges[0].weight, 2);
        assert_eq!(edges[1].weight, 1);
    }

    #[test]
    fn threshold_keeps_edges_at_or_above() {
        let edges = vec![
            CoEdge { tag1: "a".into(), tag2: "b".into(), weight: 3 },
            CoEdge { tag1: "a".into(), tag2: "c".into(), weight: 5 },
            CoEdge { tag1: "b".into(), tag2: "c".into(), weight: 7 },
        ];
        let kept = threshold_edges(&edges, 5);
        let weights: Vec<u32> = kept.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![5, 7]);
    }
}
