//! Company-level rollup — which communities does each company touch?
//!
//! Tags that never co-occurred with anything have no community; they are
//! silently dropped. A company whose tags all lack communities rolls up to
//! an empty list, which is valid, not exceptional.

use crate::types::{CommunityId, Tag};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Sorted distinct community ids touched by a company's tag set.
pub fn company_communities(
    tags: &[Tag],
    assignment: &HashMap<Tag, CommunityId>,
) -> Vec<CommunityId> {
    let ids: BTreeSet<CommunityId> = tags
        .iter()
        .filter_map(|t| assignment.get(t).copied())
        .collect();
    ids.into_iter().collect()
}

/// Structured list form, e.g. `[0, 2, 5]`. Matches what the share report
/// parses back.
pub fn format_id_list(ids: &[CommunityId]) -> String {
    let inner: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// Delimited string form for spreadsheet use, e.g. `0,2,5`.
pub fn format_id_string(ids: &[CommunityId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a stored id list leniently. Accepts `[0, 2]`, `0,2` or an empty
/// string; anything unparseable falls back to an empty list rather than
/// erroring — the rollup file may have been edited by hand in a spreadsheet.
pub fn parse_id_list(raw: &str) -> Vec<CommunityId> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();
    if inner.is_empty() {
        return Vec::new();
    }
    let mut ids = Vec::new();
    for piece in inner.split(',') {
        match piece.trim().parse::<CommunityId>() {
            Ok(id) => ids.push(id),
            Err(_) => return Vec::new(),
        }
    }
    ids
}

/// One community's slice of the membership share report.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipShare {
    pub community_id: CommunityId,
    /// Companies touching this community. A company touching several
    /// communities counts once in each.
    pub companies: usize,
    /// Percentage over companies that touch at least one community.
    pub share_pct: f64,
}

/// Count companies per community and compute shares. The denominator is the
/// number of companies belonging to at least one community.
pub fn membership_share(lists: &[Vec<CommunityId>]) -> (usize, Vec<MembershipShare>) {
    let with_any = lists.iter().filter(|l| !l.is_empty()).count();
    let mut counts: HashMap<CommunityId, usize> = HashMap::new();
    for list in lists {
        for &id in list {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut shares: Vec<MembershipShare> = counts
        .into_iter()
        .map(|(community_id, companies)| MembershipShare {
            community_id,
            companies,
            share_pct: if with_any > 0 {
                companies as f64 / with_any as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    shares.sort_by_key(|s| s.community_id);
    (with_any, shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(pairs: &[(&str, CommunityId)]) -> HashMap<Tag, CommunityId> {
        pairs.iter().map(|&(t, c)| (t.to_string(), c)).collect()
    }

    #[test]
    fn rollup_is_sorted_and_distinct() {
        let map = assignment(&[("a", 2), ("b", 0), ("c", 2)]);
        let tags: Vec<Tag> = ["a", "b", "c"].iter().map(|t| t.to_string()).collect();
        assert_eq!(company_communities(&tags, &map), vec![0, 2]);
    }

    #[test]
    fn unassigned_tags_are_dropped_silently() {
        let map = assignment(&[("a", 1)]);
        let tags: Vec<Tag> = ["a", "never-co-occurred"].iter().map(|t| t.to_string()).collect();
        assert_eq!(company_communities(&tags, &map), vec![1]);
    }

    #[test]
    fn singleton_tag_company_rolls_up_empty() {
        let map = assignment(&[("a", 0)]);
        let tags = vec!["solo".to_string()];
        assert!(company_communities(&tags, &map).is_empty());
    }

    #[test]
    fn list_forms_round_trip() {
        let ids = vec![0, 2, 5];
        assert_eq!(format_id_list(&ids), "[0, 2, 5]");
        assert_eq!(format_id_string(&ids), "0,2,5");
        assert_eq!(parse_id_list("[0, 2, 5]"), ids);
        assert_eq!(parse_id_list("0,2,5"), ids);
    }

    #[test]
    fn malformed_lists_parse_to_empty() {
        assert!(parse_id_list("").is_empty());
        assert!(parse_id_list("[]").is_empty());
        assert!(parse_id_list("not a list").is_empty());
        assert!(parse_id_list("[1, x]").is_empty());
    }

    #[test]
    fn share_counts_each_company_once_per_community() {
        // Company 1: [0, 1], company 2: [0], company 3: [] (excluded from denominator)
        let lists = vec![vec![0, 1], vec![0], vec![]];
        let (with_any, shares) = membership_share(&lists);
        assert_eq!(with_any, 2);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].community_id, 0);
        assert_eq!(shares[0].companies, 2);
        assert!((shares[0].share_pct - 100.0).abs() < 1e-9);
        assert_eq!(shares[1].companies, 1);
        assert!((shares[1].share_pct - 50.0).abs() < 1e-9);
    }
}
