//! Static HTML network views.
//!
//! Emits a self-contained HTML document rendering the network with
//! vis-network. The layout is computed upstream and frozen: physics is
//! disabled, nodes are fixed and cannot be dragged. Node color groups come
//! from community assignments.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tagnet_core::prelude::*;

/// A node ready for rendering: frozen coordinates, community color group.
#[derive(Debug, Clone, Serialize)]
pub struct VisNode {
    pub id: Tag,
    pub label: Tag,
    pub group: i64,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub physics: bool,
    pub fixed: bool,
}

/// An edge ready for rendering; `value` drives line thickness.
#[derive(Debug, Clone, Serialize)]
pub struct VisEdge {
    pub from: Tag,
    pub to: Tag,
    pub value: u32,
    pub title: String,
}

/// One renderable network document.
#[derive(Debug, Clone)]
pub struct NetworkDoc {
    pub title: String,
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

/// Renderer options shared by every view: no physics, no dragging, no
/// post-hoc layout improvement. Coordinates are final.
fn frozen_options() -> serde_json::Value {
    json!({
        "physics": { "enabled": false },
        "interaction": { "dragNodes": false },
        "layout": { "improvedLayout": false }
    })
}

/// Build the overall thresholded view. Nodes are the laid-out tags only;
/// tags without a community assignment fall into the sentinel group.
pub fn overall_network(
    title: &str,
    layout: &HashMap<Tag, (f64, f64)>,
    communities: &Communities,
    edges: &[CoEdge],
) -> NetworkDoc {
    let mut tags: Vec<&Tag> = layout.keys().collect();
    tags.sort();

    let nodes = tags
        .into_iter()
        .map(|tag| {
            let (x, y) = layout[tag];
            let group = communities
                .community_of(tag)
                .map(|id| id as i64)
                .unwrap_or(UNASSIGNED_GROUP);
            VisNode {
                id: tag.clone(),
                label: tag.clone(),
                group,
                title: format!("Tag: {}<br>Community: {}", tag, group),
                x: x * RENDER_SCALE,
                y: y * RENDER_SCALE,
                physics: false,
                fixed: true,
            }
        })
        .collect();

    NetworkDoc {
        title: title.to_string(),
        nodes,
        edges: drawable_edges(layout, edges),
    }
}

/// Build one community's view. All nodes share the community's group.
pub fn community_network(
    title: &str,
    community_id: CommunityId,
    threshold: u32,
    layout: &HashMap<Tag, (f64, f64)>,
    edges: &[CoEdge],
) -> NetworkDoc {
    let mut tags: Vec<&Tag> = layout.keys().collect();
    tags.sort();

    let nodes = tags
        .into_iter()
        .map(|tag| {
            let (x, y) = layout[tag];
            VisNode {
                id: tag.clone(),
                label: tag.clone(),
                group: community_id as i64,
                title: format!(
                    "Tag: {}<br>Community: {}<br>threshold: {}",
                    tag, community_id, threshold
                ),
                x: x * RENDER_SCALE,
                y: y * RENDER_SCALE,
                physics: false,
                fixed: true,
            }
        })
        .collect();

    NetworkDoc {
        title: title.to_string(),
        nodes,
        edges: drawable_edges(layout, edges),
    }
}

/// Edges whose endpoints both survived into the layout.
fn drawable_edges(layout: &HashMap<Tag, (f64, f64)>, edges: &[CoEdge]) -> Vec<VisEdge> {
    edges
        .iter()
        .filter(|e| layout.contains_key(&e.tag1) && layout.contains_key(&e.tag2))
        .map(|e| VisEdge {
            from: e.tag1.clone(),
            to: e.tag2.clone(),
            value: e.weight,
            title: format!("Co-occurrences: {}", e.weight),
        })
        .collect()
}

impl NetworkDoc {
    /// Render the full HTML document.
    pub fn to_html(&self) -> Result<String> {
        let nodes = serde_json::to_string(&self.nodes).context("serialize nodes")?;
        let edges = serde_json::to_string(&self.edges).context("serialize edges")?;
        let options = serde_json::to_string(&frozen_options()).context("serialize options")?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
<style>
  body {{ margin: 0; background-color: #ffffff; color: #000000; }}
  #network {{ width: 100%; height: 900px; border: none; }}
</style>
</head>
<body>
<div id="network"></div>
<script>
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var container = document.getElementById("network");
  var data = {{ nodes: nodes, edges: edges }};
  var options = {options};
  new vis.Network(container, data, options);
</script>
</body>
</html>
"#,
            title = html_escape(&self.title),
            nodes = nodes,
            edges = edges,
            options = options,
        ))
    }

    /// Write the document to disk.
    pub fn write_html(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        Ok(())
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_of(pairs: &[(&str, f64, f64)]) -> HashMap<Tag, (f64, f64)> {
        pairs
            .iter()
            .map(|&(t, x, y)| (t.to_string(), (x, y)))
            .collect()
    }

    fn edge(a: &str, b: &str, w: u32) -> CoEdge {
        CoEdge { tag1: a.into(), tag2: b.into(), weight: w }
    }

    fn communities_of(pairs: &[(&str, CommunityId)]) -> Communities {
        let assignment: HashMap<Tag, CommunityId> =
            pairs.iter().map(|&(t, c)| (t.to_string(), c)).collect();
        let mut members: Vec<Vec<Tag>> = Vec::new();
        for (tag, &id) in &assignment {
            if members.len() <= id {
                members.resize(id + 1, Vec::new());
            }
            members[id].push(tag.clone());
        }
        Communities { members, assignment, modularity: 0.0, passes: 1 }
    }

    #[test]
    fn overall_view_scales_and_freezes_nodes() {
        let layout = layout_of(&[("a", 0.5, -0.25), ("b", -1.0, 1.0)]);
        let communities = communities_of(&[("a", 0), ("b", 0)]);
        let doc = overall_network("overall", &layout, &communities, &[edge("a", "b", 3)]);

        assert_eq!(doc.nodes.len(), 2);
        let a = doc.nodes.iter().find(|n| n.id == "a").unwrap();
        assert_eq!(a.x, 0.5 * RENDER_SCALE);
        assert_eq!(a.y, -0.25 * RENDER_SCALE);
        assert!(a.fixed);
        assert!(!a.physics);
        assert_eq!(doc.edges.len(), 1);
    }

    #[test]
    fn unassigned_tags_get_sentinel_group() {
        let layout = layout_of(&[("orphan", 0.0, 0.0)]);
        let communities = communities_of(&[]);
        let doc = overall_network("overall", &layout, &communities, &[]);
        assert_eq!(doc.nodes[0].group, UNASSIGNED_GROUP);
    }

    #[test]
    fn edges_outside_the_layout_are_not_drawn() {
        let layout = layout_of(&[("a", 0.0, 0.0), ("b", 1.0, 1.0)]);
        let communities = communities_of(&[("a", 0), ("b", 0)]);
        let edges = vec![edge("a", "b", 5), edge("a", "c", 9)];
        let doc = overall_network("overall", &layout, &communities, &edges);
        assert_eq!(doc.edges.len(), 1);
    }

    #[test]
    fn html_disables_physics_and_dragging() {
        let layout = layout_of(&[("a", 0.0, 0.0)]);
        let doc = community_network("community 0", 0, 30, &layout, &[]);
        let html = doc.to_html().unwrap();
        assert!(html.contains(r#""physics":{"enabled":false}"#));
        assert!(html.contains(r#""dragNodes":false"#));
        assert!(html.contains("vis-network.min.js"));
    }
}
