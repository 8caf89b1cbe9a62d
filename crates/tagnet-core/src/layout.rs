//! Force-directed 2D layout for thresholded network views.
//!
//! A seeded Fruchterman–Reingold placement: nodes repel each other, edges
//! pull their endpoints together in proportion to weight, and a cooling
//! temperature caps per-iteration displacement. Coordinates are computed
//! once per view and frozen — the rendered artifact has no physics.
//!
//! Exact coordinates are non-normative; only grouping properties matter.
//! Identical input and seed produce identical coordinates.

use crate::graph::TagGraph;
use crate::rng::Lcg;
use crate::types::Tag;
use std::collections::HashMap;

/// Multiplier applied to raw ~[-1, 1] coordinates before rendering.
/// Presentation-only: it spreads nodes far enough apart to be legible at
/// the renderer's default zoom and has no semantic meaning.
pub const RENDER_SCALE: f64 = 1000.0;

/// Parameters for the force-directed layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Seed for initial node placement.
    pub seed: u64,
    /// Number of relaxation iterations.
    pub iterations: usize,
    /// Optimal node distance. `None` uses 1/sqrt(node_count).
    pub k: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 80,
            k: None,
        }
    }
}

/// Compute a frozen layout for every node of the view graph.
///
/// Nodes absent from the view graph (filtered out by the threshold) get no
/// coordinates and are not drawn.
pub fn force_layout(graph: &TagGraph, config: &LayoutConfig) -> HashMap<Tag, (f64, f64)> {
    let (tags, edges) = graph.dense();
    let n = tags.len();
    if n == 0 {
        return HashMap::new();
    }
    if n == 1 {
        return HashMap::from([(tags[0].clone(), (0.0, 0.0))]);
    }

    let k = config
        .k
        .unwrap_or_else(|| 1.0 / (n as f64).sqrt())
        .max(f64::EPSILON);
    let max_weight = edges
        .iter()
        .map(|&(_, _, w)| w)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    // Seeded initial scatter in the unit square.
    let mut rng = Lcg::new(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.next_f64(), rng.next_f64()))
        .collect();

    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![(0.0, 0.0); n];

        // Repulsion between every node pair: k²/d.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        // Attraction along edges: d²/k, scaled by normalized weight.
        for &(i, j, w) in &edges {
            let dx = pos[i].0 - pos[j].0;
            let dy = pos[i].1 - pos[j].1;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = dist * dist / k * (w / max_weight);
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[i].0 -= fx;
            disp[i].1 -= fy;
            disp[j].0 += fx;
            disp[j].1 += fy;
        }

        // Apply displacements, capped by the current temperature.
        for i in 0..n {
            let (dx, dy) = disp[i];
            let len = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = len.min(temperature);
            pos[i].0 += dx / len * step;
            pos[i].1 += dy / len * step;
        }

        temperature -= cooling;
    }

    rescale(&mut pos);

    tags.into_iter().zip(pos).collect()
}

/// Center positions on the origin and scale the largest coordinate
/// magnitude to 1, so all layouts land in ~[-1, 1]².
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;
    let mut max_abs: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        max_abs = max_abs.max(p.0.abs()).max(p.1.abs());
    }
    if max_abs > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= max_abs;
            p.1 /= max_abs;
        }
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
    fn empty_graph_has_empty_layout() {
        assert!(force_layout(&TagGraph::new(), &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn every_node_gets_a_coordinate() {
        let g = graph(&[("a", "b", 2), ("b", "c", 1)]);
        let layout = force_layout(&g, &LayoutConfig::default());
        assert_eq!(layout.len(), 3);
        for tag in g.tags() {
            assert!(layout.contains_key(&tag));
        }
    }

    #[test]
    fn coordinates_land_in_unit_box() {
        let g = graph(&[("a", "b", 1), ("b", "c", 2), ("c", "d", 3), ("a", "d", 1)]);
        let layout = force_layout(&g, &LayoutConfig::default());
        for &(x, y) in layout.values() {
            assert!(x.abs() <= 1.0 + 1e-9, "x out of range: {}", x);
            assert!(y.abs() <= 1.0 + 1e-9, "y out of range: {}", y);
        }
    }

    #[test]
    fn fixed_seed_reproduces_layout() {
        let g = graph(&[("a", "b", 3), ("b", "c", 1), ("a", "c", 2), ("c", "d", 4)]);
        let config = LayoutConfig { seed: 7, ..Default::default() };
        let first = force_layout(&g, &config);
        let second = force_layout(&g, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn strongly_tied_nodes_sit_closer() {
        // a—b is much heavier than b—c; after relaxation the heavy pair
        // should not be the farthest apart.
        let g = graph(&[("a", "b", 100), ("b", "c", 1), ("a", "c", 1), ("c", "d", 1)]);
        let layout = force_layout(&g, &LayoutConfig::default());
        let dist = |p: &str, q: &str| -> f64 {
            let (px, py) = layout[p];
            let (qx, qy) = layout[q];
            ((px - qx).powi(2) + (py - qy).powi(2)).sqrt()
        };
        assert!(dist("a", "b") < dist("a", "d"));
    }
}
