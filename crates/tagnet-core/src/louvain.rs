//! Louvain community detection over the full co-occurrence graph.
//!
//! Two-phase modularity optimization:
//!
//! 1. **Local moving** — every node starts in its own community; nodes move
//!    to the neighboring community with the largest strictly positive
//!    modularity gain until a full sweep changes nothing.
//! 2. **Aggregation** — each community contracts into a super-node
//!    (inter-community weights sum, intra-community weight becomes a
//!    self-loop) and phase 1 reruns on the contracted graph.
//!
//! The resolution parameter γ scales the null-model term of the modularity
//! objective: higher γ penalizes large communities and yields more, smaller
//! ones. Node visit order is shuffled by a seeded generator, so identical
//! input and seed reproduce identical membership.
//!
//! Reference: Blondel et al. (2008) "Fast unfolding of communities in large networks"

use crate::error::{Result, TagnetError};
use crate::graph::TagGraph;
use crate::rng::Lcg;
use crate::types::{CommunityId, Tag};
use std::collections::HashMap;

/// Parameters for community detection.
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Resolution γ of the modularity objective. Must be positive.
    pub resolution: f64,
    /// Seed for the node visit order.
    pub seed: u64,
    /// Hard cap on aggregation passes.
    pub max_passes: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 0,
            max_passes: 100,
        }
    }
}

/// A detected partition of the graph's tags.
///
/// Communities are pairwise disjoint and cover exactly the node set of the
/// input graph. Ids are canonical: largest community first, ties broken by
/// the lexicographically smallest member tag.
#[derive(Debug, Clone)]
pub struct Communities {
    /// Member tags per community, sorted within each community.
    pub members: Vec<Vec<Tag>>,
    /// Tag → community id.
    pub assignment: HashMap<Tag, CommunityId>,
    /// Modularity of the final partition at the configured resolution.
    pub modularity: f64,
    /// Number of aggregation passes performed.
    pub passes: usize,
}

impl Communities {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn community_of(&self, tag: &str) -> Option<CommunityId> {
        self.assignment.get(tag).copied()
    }
}

/// Run Louvain on the full graph.
pub fn detect_communities(graph: &TagGraph, config: &LouvainConfig) -> Result<Communities> {
    if config.resolution <= 0.0 {
        return Err(TagnetError::out_of_range(
            "resolution",
            0.0,
            config.resolution,
        ));
    }

    let (tags, edges) = graph.dense();
    if tags.is_empty() {
        return Ok(Communities {
            members: Vec::new(),
            assignment: HashMap::new(),
            modularity: 0.0,
            passes: 0,
        });
    }

    let mut g = LouvainGraph::from_edges(tags.len(), &edges);
    // membership[i] = index of the super-node currently containing tag i
    let mut membership: Vec<usize> = (0..tags.len()).collect();
    let mut rng = Lcg::new(config.seed);
    let mut passes = 0;

    loop {
        passes += 1;
        let improved = g.local_moving(config.resolution, &mut rng);
        if !improved || passes >= config.max_passes {
            break;
        }

        let (contracted, node_map) = g.aggregate();
        if contracted.node_count() == g.node_count() {
            break;
        }
        for m in membership.iter_mut() {
            *m = node_map[*m];
        }
        g = contracted;
    }

    let modularity = g.modularity(config.resolution);

    // Resolve each tag to its final community label, then canonicalize ids.
    let mut grouped: HashMap<usize, Vec<Tag>> = HashMap::new();
    for (i, tag) in tags.iter().enumerate() {
        let label = g.community_of(membership[i]);
        grouped.entry(label).or_default().push(tag.clone());
    }

    let mut members: Vec<Vec<Tag>> = grouped.into_values().collect();
    for community in members.iter_mut() {
        community.sort();
    }
    members.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

    let mut assignment = HashMap::new();
    for (id, community) in members.iter().enumerate() {
        for tag in community {
            assignment.insert(tag.clone(), id);
        }
    }

    Ok(Communities {
        members,
        assignment,
        modularity,
        passes,
    })
}

/// Working representation: dense nodes, adjacency lists, and per-community
/// degree totals maintained incrementally.
struct LouvainGraph {
    /// community[i] = current community label of node i.
    community: Vec<usize>,
    /// Weighted degree of each node (self-loops count twice).
    weighted_degree: Vec<f64>,
    /// Self-loop weight of each node (intra-community weight after contraction).
    self_loop: Vec<f64>,
    /// adj[i] = (neighbor, weight), excluding self-loops.
    adj: Vec<Vec<(usize, f64)>>,
    /// Σ of weighted degrees per community label.
    comm_degree: Vec<f64>,
    /// Total edge weight m (each undirected edge once, self-loops once).
    total_weight: f64,
}

impl LouvainGraph {
    fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut weighted_degree = vec![0.0; node_count];
        let mut self_loop = vec![0.0; node_count];
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        let mut total_weight = 0.0;

        for &(a, b, w) in edges {
            if a == b {
                self_loop[a] += w;
                weighted_degree[a] += 2.0 * w;
            } else {
                adj[a].push((b, w));
                adj[b].push((a, w));
                weighted_degree[a] += w;
                weighted_degree[b] += w;
            }
            total_weight += w;
        }

        Self {
            community: (0..node_count).collect(),
            comm_degree: weighted_degree.clone(),
            weighted_degree,
            self_loop,
            adj,
            total_weight,
        }
    }

    fn node_count(&self) -> usize {
        self.community.len()
    }

    fn community_of(&self, node: usize) -> usize {
        self.community[node]
    }

    /// Phase 1. Returns true if any node changed community.
    fn local_moving(&mut self, resolution: f64, rng: &mut Lcg) -> bool {
        let n = self.node_count();
        if self.total_weight == 0.0 {
            return false;
        }
        let m = self.total_weight;
        let m2 = 2.0 * m;

        let mut order: Vec<usize> = (0..n).collect();
        let mut improved = false;

        loop {
            let mut changed = false;
            rng.shuffle(&mut order);

            for &i in &order {
                let current = self.community[i];
                let ki = self.weighted_degree[i];

                // Weight from i into each neighboring community.
                let mut neighbor_weight: HashMap<usize, f64> = HashMap::new();
                for &(j, w) in &self.adj[i] {
                    *neighbor_weight.entry(self.community[j]).or_insert(0.0) += w;
                }

                // Take i out of its community before evaluating gains, so
                // "staying" and "moving" are judged on equal footing.
                self.comm_degree[current] -= ki;
                let stay_weight = neighbor_weight.get(&current).copied().unwrap_or(0.0);
                let gain = |w_in: f64, sigma: f64| {
                    w_in / m - resolution * (sigma * ki) / (m2 * m)
                };

                let mut best = current;
                let mut best_gain = gain(stay_weight, self.comm_degree[current]);
                for (&c, &w_in) in &neighbor_weight {
                    if c == current {
                        continue;
                    }
                    let g = gain(w_in, self.comm_degree[c]);
                    // Strictly positive improvement over staying put.
                    if g > best_gain + 1e-12 {
                        best_gain = g;
                        best = c;
                    }
                }

                self.comm_degree[best] += ki;
                self.community[i] = best;
                if best != current {
                    changed = true;
                    improved = true;
                }
            }

            if !changed {
                break;
            }
        }

        improved
    }

    /// Phase 2. Contract communities into super-nodes. Returns the
    /// contracted graph and `node_map[old_node] = new_node`.
    fn aggregate(&self) -> (Self, Vec<usize>) {
        let mut comm_to_new: HashMap<usize, usize> = HashMap::new();
        let mut node_map = vec![0; self.node_count()];
        for (i, &c) in self.community.iter().enumerate() {
            let next = comm_to_new.len();
            let new_idx = *comm_to_new.entry(c).or_insert(next);
            node_map[i] = new_idx;
        }

        let new_count = comm_to_new.len();
        let mut merged: HashMap<(usize, usize), f64> = HashMap::new();

        for (i, neighbors) in self.adj.iter().enumerate() {
            let ni = node_map[i];
            for &(j, w) in neighbors {
                if i < j {
                    let nj = node_map[j];
                    let key = if ni <= nj { (ni, nj) } else { (nj, ni) };
                    *merged.entry(key).or_insert(0.0) += w;
                }
            }
        }
        for (i, &w) in self.self_loop.iter().enumerate() {
            if w > 0.0 {
                *merged.entry((node_map[i], node_map[i])).or_insert(0.0) += w;
            }
        }

        let edges: Vec<(usize, usize, f64)> = merged
            .into_iter()
            .map(|((a, b), w)| (a, b, w))
            .collect();
        (Self::from_edges(new_count, &edges), node_map)
    }

    /// Modularity of the current partition at resolution γ:
    /// Q = Σc [ w_in(c)/m − γ·(Σdeg(c)/2m)² ]
    fn modularity(&self, resolution: f64) -> f64 {
        if self.total_weight == 0.0 {
            return 0.0;
        }
        let m = self.total_weight;
        let m2 = 2.0 * m;

        let mut internal: HashMap<usize, f64> = HashMap::new();
        for (i, &w) in self.self_loop.iter().enumerate() {
            *internal.entry(self.community[i]).or_insert(0.0) += w;
        }
        for (i, neighbors) in self.adj.iter().enumerate() {
            for &(j, w) in neighbors {
                if i < j && self.community[i] == self.community[j] {
                    *internal.entry(self.community[i]).or_insert(0.0) += w;
                }
            }
        }

        let mut degree: HashMap<usize, f64> = HashMap::new();
        for (i, &d) in self.weighted_degree.iter().enumerate() {
            *degree.entry(self.community[i]).or_insert(0.0) += d;
        }

        degree
            .iter()
            .map(|(c, &d)| {
                let w_in = internal.get(c).copied().unwrap_or(0.0);
                w_in / m - resolution * (d / m2).powi(2)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoEdge;

    fn graph(edges: &[(&str, &str, u32)]) -> TagGraph {
        let edges: Vec<CoEdge> = edges
            .iter()
            .map(|&(a, b, w)| CoEdge { tag1: a.into(), tag2: b.into(), weight: w })
            .collect();
        TagGraph::from_edges(&edges)
    }

    #[test]
    fn empty_graph_yields_no_communities() {
        let result = detect_communities(&TagGraph::new(), &LouvainConfig::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.modularity, 0.0);
    }

    #[test]
    fn invalid_resolution_is_rejected() {
        let config = LouvainConfig { resolution: 0.0, ..Default::default() };
        assert!(detect_communities(&TagGraph::new(), &config).is_err());
    }

    #[test]
    fn connected_pair_merges() {
        let g = graph(&[("a", "b", 1)]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.members[0], vec!["a", "b"]);
    }

    #[test]
    fn triangle_is_one_community() {
        let g = graph(&[("a", "b", 1), ("b", "c", 1), ("a", "c", 1)]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn weakly_bridged_triangles_split_in_two() {
        let g = graph(&[
            ("a", "b", 10),
            ("b", "c", 10),
            ("a", "c", 10),
            ("x", "y", 10),
            ("y", "z", 10),
            ("x", "z", 10),
            ("c", "x", 1),
        ]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.modularity > 0.0);
        // Same community within each triangle.
        assert_eq!(result.community_of("a"), result.community_of("c"));
        assert_eq!(result.community_of("x"), result.community_of("z"));
        assert_ne!(result.community_of("a"), result.community_of("x"));
    }

    #[test]
    fn partition_covers_node_set_exactly() {
        let g = graph(&[("a", "b", 2), ("b", "c", 1), ("d", "e", 4)]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        let mut covered: Vec<Tag> = result.members.iter().flatten().cloned().collect();
        covered.sort();
        assert_eq!(covered, g.tags());
        // Disjoint: total member count equals node count.
        let total: usize = result.members.iter().map(|c| c.len()).sum();
        assert_eq!(total, g.node_count());
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let g = graph(&[
            ("a", "b", 3),
            ("b", "c", 2),
            ("a", "c", 4),
            ("c", "d", 1),
            ("d", "e", 5),
            ("e", "f", 5),
            ("d", "f", 5),
        ]);
        let config = LouvainConfig { seed: 42, ..Default::default() };
        let first = detect_communities(&g, &config).unwrap();
        let second = detect_communities(&g, &config).unwrap();
        assert_eq!(first.assignment, second.assignment);
        assert_eq!(first.members, second.members);
    }

    #[test]
    fn low_resolution_merges_more() {
        let edges = [
            ("a", "b", 5),
            ("b", "c", 5),
            ("a", "c", 5),
            ("x", "y", 5),
            ("y", "z", 5),
            ("x", "z", 5),
            ("c", "x", 1),
        ];
        let g = graph(&edges);
        let fine = detect_communities(&g, &LouvainConfig::default()).unwrap();
        let coarse_config = LouvainConfig { resolution: 0.05, ..Default::default() };
        let coarse = detect_communities(&g, &coarse_config).unwrap();
        assert!(coarse.len() <= fine.len());
        assert_eq!(coarse.len(), 1);
    }

    #[test]
    fn canonical_ids_order_by_size_then_tag() {
        // One 3-tag community and one 2-tag community.
        let g = graph(&[
            ("p", "q", 5),
            ("q", "r", 5),
            ("p", "r", 5),
            ("a", "b", 5),
        ]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.members[0].len(), 3);
        assert_eq!(result.community_of("p"), Some(0));
        assert_eq!(result.community_of("a"), Some(1));
    }

    #[test]
    fn weighted_edges_dominate_grouping() {
        let g = graph(&[("a", "b", 50), ("c", "d", 50), ("b", "c", 1)]);
        let result = detect_communities(&g, &LouvainConfig::default()).unwrap();
        assert_eq!(result.community_of("a"), result.community_of("b"));
        assert_eq!(result.community_of("c"), result.community_of("d"));
        assert_ne!(result.community_of("a"), result.community_of("c"));
    }
}
