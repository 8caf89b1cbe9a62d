//! Community summaries — one row per community for the overview CSV.

use serde::Serialize;
use std::collections::BTreeSet;
use tagnet_core::prelude::*;

/// One community's summary row: size, internal edge count, and its
/// highest-degree member tags.
#[derive(Debug, Clone, Serialize)]
pub struct CommunitySummary {
    pub community_id: CommunityId,
    pub num_tags: usize,
    pub num_edges: usize,
    /// Top member tags by intra-community degree, comma-joined.
    pub top_tags: String,
}

/// Summarize every community against the full graph. `top_n` truncates the
/// top-tags listing (degree descending, ties by tag order).
pub fn summarize(graph: &TagGraph, communities: &Communities, top_n: usize) -> Vec<CommunitySummary> {
    communities
        .members
        .iter()
        .enumerate()
        .map(|(id, members)| {
            let member_set: BTreeSet<Tag> = members.iter().cloned().collect();
            let sub = graph.subgraph(&member_set);

            let mut ranked: Vec<(&Tag, usize)> =
                members.iter().map(|t| (t, sub.degree(t))).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            let top_tags = ranked
                .iter()
                .take(top_n)
                .map(|(t, _)| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            CommunitySummary {
                community_id: id,
                num_tags: members.len(),
                num_edges: sub.edge_count(),
                top_tags,
            }
        })
        .collect()
}
