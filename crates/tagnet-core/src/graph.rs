//! The tag co-occurrence graph.
//!
//! Backed by petgraph's undirected `Graph` with a tag → index map for O(1)
//! lookup by label. Two constructions exist: the *full* graph (all edges,
//! community detection input — never filtered) and *view* graphs (edges at
//! or above a weight threshold, rendering input only).

use crate::types::{CoEdge, Tag};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use std::collections::{BTreeSet, HashMap};

/// Weighted undirected graph over tags.
#[derive(Debug, Clone, Default)]
pub struct TagGraph {
    graph: Graph<Tag, u32, Undirected>,
    index: HashMap<Tag, NodeIndex>,
}

impl TagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from every edge in the table. Nodes are exactly the tags that
    /// appear in at least one edge; isolated tags never enter the graph.
    pub fn from_edges(edges: &[CoEdge]) -> Self {
        let mut g = Self::new();
        for edge in edges {
            g.add_edge(&edge.tag1, &edge.tag2, edge.weight);
        }
        g
    }

    /// Build from edges with `weight >= min_weight` only. Used for display
    /// views; community detection always runs on the unfiltered graph.
    pub fn from_edges_thresholded(edges: &[CoEdge], min_weight: u32) -> Self {
        let mut g = Self::new();
        for edge in edges.iter().filter(|e| e.weight >= min_weight) {
            g.add_edge(&edge.tag1, &edge.tag2, edge.weight);
        }
        g
    }

    fn intern(&mut self, tag: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(tag) {
            return idx;
        }
        let idx = self.graph.add_node(tag.to_string());
        self.index.insert(tag.to_string(), idx);
        idx
    }

    /// Add an edge, replacing the weight if the edge already exists.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) {
        let ai = self.intern(a);
        let bi = self.intern(b);
        if let Some(edge_idx) = self.graph.find_edge(ai, bi) {
            self.graph[edge_idx] = weight;
        } else {
            self.graph.add_edge(ai, bi, weight);
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// All tags, sorted lexicographically. Sorting keeps every downstream
    /// computation independent of hash iteration order.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.index.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Number of incident edges (unweighted degree).
    pub fn degree(&self, tag: &str) -> usize {
        self.index
            .get(tag)
            .map(|&idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    /// All edges as `(tag1, tag2, weight)` with the pair in canonical order.
    pub fn edges(&self) -> Vec<(Tag, Tag, u32)> {
        self.graph
            .edge_references()
            .map(|e| {
                let a = self.graph[e.source()].clone();
                let b = self.graph[e.target()].clone();
                let w = *e.weight();
                if a <= b { (a, b, w) } else { (b, a, w) }
            })
            .collect()
    }

    /// Induced subgraph over a set of member tags.
    pub fn subgraph(&self, members: &BTreeSet<Tag>) -> TagGraph {
        let mut sub = TagGraph::new();
        for (a, b, w) in self.edges() {
            if members.contains(&a) && members.contains(&b) {
                sub.add_edge(&a, &b, w);
            }
        }
        sub
    }

    /// Dense representation for the numeric algorithms: tags in sorted
    /// order, edges as index pairs with float weights.
    pub fn dense(&self) -> (Vec<Tag>, Vec<(usize, usize, f64)>) {
        let tags = self.tags();
        let pos: HashMap<&str, usize> = tags
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();
        let mut edges: Vec<(usize, usize, f64)> = self
            .edges()
            .into_iter()
            .map(|(a, b, w)| {
                let (i, j) = (pos[a.as_str()], pos[b.as_str()]);
                if i <= j { (i, j, w as f64) } else { (j, i, w as f64) }
            })
            .collect();
        edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        (tags, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, b: &str, w: u32) -> CoEdge {
        CoEdge { tag1: a.into(), tag2: b.into(), weight: w }
    }

    #[test]
    fn builds_nodes_from_edges_only() {
        let g = TagGraph::from_edges(&[edge("a", "b", 2), edge("b", "c", 1)]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains("a"));
        assert!(!g.contains("isolated"));
    }

    #[test]
    fn thresholded_graph_is_a_subset() {
        let edges = vec![edge("a", "b", 3), edge("a", "c", 5), edge("b", "c", 7)];
        let full = TagGraph::from_edges(&edges);
        let view = TagGraph::from_edges_thresholded(&edges, 5);
        assert_eq!(view.edge_count(), 2);
        // Filtering never introduces a node absent from the full graph.
        for tag in view.tags() {
            assert!(full.contains(&tag));
        }
    }

    #[test]
    fn degree_counts_incident_edges() {
        let g = TagGraph::from_edges(&[edge("a", "b", 1), edge("a", "c", 1)]);
        assert_eq!(g.degree("a"), 2);
        assert_eq!(g.degree("b"), 1);
        assert_eq!(g.degree("missing"), 0);
    }

    #[test]
    fn subgraph_keeps_internal_edges_only() {
        let g = TagGraph::from_edges(&[edge("a", "b", 1), edge("b", "c", 1), edge("c", "d", 1)]);
        let members: BTreeSet<Tag> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let sub = g.subgraph(&members);
        assert_eq!(sub.edge_count(), 2);
        assert!(!sub.contains("d"));
    }

    #[test]
    fn dense_indexing_is_sorted_and_stable() {
        let g = TagGraph::from_edges(&[edge("b", "c", 2), edge("a", "c", 1)]);
        let (tags, edges) = g.dense();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert_eq!(edges, vec![(0, 2, 1.0), (1, 2, 2.0)]);
    }
}
