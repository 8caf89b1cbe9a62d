//! Count tag frequencies across the company table.

use anyhow::Result;
use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;
use tagnet_core::prelude::*;
use tagnet_report::csv_io;

use crate::config::Config;

pub fn run(config: &Config, input: Option<String>, output: &str) -> Result<()> {
    let input = input.unwrap_or_else(|| config.input.path.clone());
    let table = csv_io::read_companies(Path::new(&input), &config.input.tag_column)?;
    let extractor = config.extractor();

    let companies: Vec<Vec<Tag>> = (0..table.len())
        .map(|i| extractor.extract(table.raw_tags(i)))
        .collect();
    let (total, rows) = tally(&companies);

    csv_io::write_tag_counts(Path::new(output), &rows)?;

    println!(
        "{} Counted {} tag occurrences ({} distinct) across {} companies",
        "→".blue(),
        total.to_string().cyan(),
        rows.len().to_string().cyan(),
        table.len().to_string().cyan()
    );
    for (tag, count) in rows.iter().take(10) {
        println!("  {:>6}  {}", count.to_string().cyan(), tag);
    }

    println!();
    println!("{} Written to {}", "✓".green().bold(), output.cyan());
    Ok(())
}

/// Total occurrence count plus per-tag counts sorted by descending count
/// (ties by tag). Every occurrence counts, including repeats within one
/// company.
fn tally(companies: &[Vec<Tag>]) -> (u64, Vec<(Tag, u64)>) {
    let mut counts: HashMap<Tag, u64> = HashMap::new();
    let mut total = 0u64;
    for tags in companies {
        for tag in tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
            total += 1;
        }
    }

    let mut rows: Vec<(Tag, u64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    (total, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<Tag> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn tally_reports_total_and_distinct() {
        let companies = vec![tags(&["a", "b", "a"]), tags(&["b", "c"])];
        let (total, rows) = tally(&companies);
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn rows_sort_by_count_then_tag() {
        let companies = vec![tags(&["b", "a"]), tags(&["b"])];
        let (_, rows) = tally(&companies);
        assert_eq!(rows[0], ("b".to_string(), 2));
        assert_eq!(rows[1], ("a".to_string(), 1));
    }
}
