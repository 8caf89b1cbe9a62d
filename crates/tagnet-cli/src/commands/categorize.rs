//! Classify tags and companies into business categories.
//!
//! Tags go through the anchor dictionary; company descriptions go through
//! keyword scoring. No similarity scorer is wired in here, so keyword ties
//! resolve by dictionary order and keyword misses stay unclassified.

use anyhow::Result;
use colored::Colorize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tagnet_core::prelude::*;
use tagnet_report::csv_io::{self, CategoryAnnotation};

use crate::config::Config;

pub fn run(
    config: &Config,
    input: Option<String>,
    text_column: &str,
    output: Option<String>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.input.path.clone());
    let out_dir = output.unwrap_or_else(|| config.output.dir.clone());
    let out_dir = Path::new(&out_dir);
    if !out_dir.exists() {
        std::fs::create_dir_all(out_dir)?;
    }

    let table = csv_io::read_companies(Path::new(&input), &config.input.tag_column)?;
    let extractor = config.extractor();
    let rules = default_rules();

    let text_col = table.column(text_column);
    if text_col.is_none() {
        println!(
            "{} No '{}' column; text classification skipped",
            "·".dimmed(),
            text_column
        );
    }

    // Classify the distinct tag vocabulary once.
    let mut vocabulary: BTreeSet<Tag> = BTreeSet::new();
    let company_tags: Vec<Vec<Tag>> = (0..table.len())
        .map(|i| {
            let tags = extractor.extract(table.raw_tags(i));
            vocabulary.extend(tags.iter().cloned());
            tags
        })
        .collect();
    let vocabulary: Vec<Tag> = vocabulary.into_iter().collect();
    let tag_rows = classify_tags(&vocabulary, &rules);

    let classified = tag_rows.iter().filter(|r| r.category.is_some()).count();
    println!(
        "{} Classified {} of {} distinct tags",
        "→".blue(),
        classified.to_string().cyan(),
        vocabulary.len().to_string().cyan()
    );

    let tag_map: HashMap<Tag, String> = tag_rows
        .iter()
        .filter_map(|r| r.category.clone().map(|c| (r.tag.clone(), c)))
        .collect();

    // Annotate each company from its tags and its description text.
    let annotations: Vec<CategoryAnnotation> = company_tags
        .iter()
        .enumerate()
        .map(|(i, tags)| {
            let categories = company_categories(tags, &tag_map);
            let primary_from_tags = primary_category(tags, &tag_map);

            let text = text_col
                .and_then(|col| table.rows[i].get(col))
                .unwrap_or("");
            let (primary_from_text, method) = rules.classify_text(text, None);

            let mut all: BTreeSet<String> = categories.iter().cloned().collect();
            if let Some(cat) = &primary_from_text {
                all.insert(cat.clone());
            }

            CategoryAnnotation {
                categories,
                primary_from_tags,
                primary_from_text,
                text_method: method.to_string(),
                all_categories: all.into_iter().collect(),
            }
        })
        .collect();

    let tags_path = out_dir.join("tag_categories.csv");
    csv_io::write_tag_categories(&tags_path, &tag_rows)?;
    let companies_path = out_dir.join("companies_with_categories.csv");
    csv_io::write_companies_with_categories(&companies_path, &table, &annotations)?;

    println!();
    println!("{} Categorization complete!", "✓".green().bold());
    println!("  Tags CSV:      {}", tags_path.display().to_string().cyan());
    println!("  Companies CSV: {}", companies_path.display().to_string().cyan());
    Ok(())
}
