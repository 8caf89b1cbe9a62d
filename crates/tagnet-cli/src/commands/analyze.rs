//! Run the full analysis pipeline.
//!
//! Reads the company table, counts tag co-occurrences, detects communities
//! on the full (unthresholded) graph, then writes the tabular artifacts and
//! the thresholded HTML network views.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::Path;
use tagnet_core::prelude::*;
use tagnet_report::{csv_io, html, summary};

use crate::config::Config;

pub fn run(
    config: &Config,
    input: Option<String>,
    output: Option<String>,
    threshold: Option<u32>,
    resolution: Option<f64>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.input.path.clone());
    let out_dir = output.unwrap_or_else(|| config.output.dir.clone());
    let overall_threshold = threshold.unwrap_or(config.analysis.overall_threshold);

    let mut louvain = config.analysis.louvain();
    if let Some(r) = resolution {
        louvain.resolution = r;
    }

    let out_dir = Path::new(&out_dir);
    if !out_dir.exists() {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create: {}", out_dir.display()))?;
    }

    // Extract per-company tag lists
    let table = csv_io::read_companies(Path::new(&input), &config.input.tag_column)?;
    let extractor = config.extractor();
    let companies: Vec<Vec<Tag>> = (0..table.len())
        .map(|i| extractor.extract(table.raw_tags(i)))
        .collect();
    println!(
        "{} Loaded {} companies from {}",
        "→".blue(),
        companies.len().to_string().cyan(),
        input.cyan()
    );

    // Count co-occurrences
    let cooccur = CoOccurrence::from_companies(&companies);
    let edges = cooccur.edges();
    println!(
        "{} Counted {} co-occurring tag pairs",
        "→".blue(),
        edges.len().to_string().cyan()
    );

    let edges_path = out_dir.join("cooccurrence_edges.csv");
    csv_io::write_edges(&edges_path, &edges)?;

    // Communities are detected on the FULL graph; thresholds only affect
    // what gets drawn.
    let full_graph = TagGraph::from_edges(&edges);
    let communities = detect_communities(&full_graph, &louvain)?;
    println!(
        "{} Detected {} communities (modularity {:.4}, {} passes)",
        "→".blue(),
        communities.len().to_string().cyan(),
        communities.modularity,
        communities.passes
    );

    let summary_path = out_dir.join("community_summary.csv");
    let summaries = summary::summarize(&full_graph, &communities, config.output.top_tags);
    csv_io::write_community_summary(&summary_path, &summaries)?;

    let tag_map_path = out_dir.join("tag_communities.csv");
    csv_io::write_tag_communities(&tag_map_path, &communities)?;

    // Per-company rollup: which communities each company touches
    let lists: Vec<Vec<CommunityId>> = companies
        .iter()
        .map(|tags| company_communities(tags, &communities.assignment))
        .collect();
    let rollup_path = out_dir.join("companies_with_communities.csv");
    csv_io::write_companies_with_communities(&rollup_path, &table, &lists)?;

    // Overall thresholded view
    let overall_edges = threshold_edges(&edges, overall_threshold);
    let overall_graph = TagGraph::from_edges(&overall_edges);
    let layout = force_layout(&overall_graph, &config.layout.to_layout());
    let overall_path = out_dir.join("network_overall.html");
    html::overall_network(
        &format!("Tag network (weight >= {})", overall_threshold),
        &layout,
        &communities,
        &overall_edges,
    )
    .write_html(&overall_path)?;
    println!(
        "{} Overall view: {} nodes, {} edges at threshold {}",
        "→".blue(),
        layout.len().to_string().cyan(),
        overall_edges.len().to_string().cyan(),
        overall_threshold.to_string().cyan()
    );

    // Per-community views. A skipped community emits nothing: no HTML and
    // no CSVs.
    let mut rendered = 0usize;
    for (id, members) in communities.members.iter().enumerate() {
        if members.len() < config.analysis.min_community_nodes {
            println!(
                "{} Community {}: {} members, below minimum {}, skipped",
                "·".dimmed(),
                id,
                members.len(),
                config.analysis.min_community_nodes
            );
            continue;
        }

        let member_set: BTreeSet<Tag> = members.iter().cloned().collect();
        let threshold = config.analysis.threshold_for(id);
        let all_edges: Vec<CoEdge> = edges
            .iter()
            .filter(|e| member_set.contains(&e.tag1) && member_set.contains(&e.tag2))
            .cloned()
            .collect();
        let community_edges = threshold_edges(&all_edges, threshold);
        if community_edges.is_empty() {
            println!(
                "{} Community {}: no edges at threshold {}, skipped",
                "·".dimmed(),
                id,
                threshold
            );
            continue;
        }

        csv_io::write_community_edges(
            &out_dir.join(format!("community_{}_edges_all.csv", id)),
            id,
            &all_edges,
        )?;
        let edges_path = out_dir.join(format!("community_{}_edges.csv", id));
        csv_io::write_community_edges(&edges_path, id, &community_edges)?;

        let community_graph = TagGraph::from_edges(&community_edges);
        let layout = force_layout(&community_graph, &config.layout.to_layout());
        let html_path = out_dir.join(format!("network_community_{}.html", id));
        html::community_network(
            &format!("Community {} (weight >= {})", id, threshold),
            id,
            threshold,
            &layout,
            &community_edges,
        )
        .write_html(&html_path)?;
        rendered += 1;
    }

    println!();
    println!("{} Analysis complete!", "✓".green().bold());
    println!("  Edges CSV:      {}", edges_path.display().to_string().cyan());
    println!("  Summary CSV:    {}", summary_path.display().to_string().cyan());
    println!("  Tag map CSV:    {}", tag_map_path.display().to_string().cyan());
    println!("  Rollup CSV:     {}", rollup_path.display().to_string().cyan());
    println!("  Overall HTML:   {}", overall_path.display().to_string().cyan());
    println!(
        "  Community HTML: {} of {} rendered",
        rendered.to_string().cyan(),
        communities.len().to_string().cyan()
    );

    Ok(())
}
