//! CSV readers and writers for every tabular artifact.
//!
//! Input tables may carry a UTF-8 BOM (spreadsheet exports usually do); the
//! reader strips it. All outputs are written *with* a BOM so the Japanese
//! tag data opens correctly in spreadsheets.

use anyhow::{bail, Context, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tagnet_core::prelude::*;
use tagnet_core::rollup;

use crate::summary::CommunitySummary;

/// The input table: headers plus raw records, with the tag column resolved.
/// Non-tag columns are passed through untouched to annotated outputs.
#[derive(Debug, Clone)]
pub struct CompanyTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
    tag_col: usize,
}

impl CompanyTable {
    /// Raw tag field of one row, `None` when the cell is missing.
    pub fn raw_tags(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(self.tag_col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read the company table. Fails hard on unreadable files or a missing tag
/// column — this is an operator-run batch job, not a service.
pub fn read_companies(path: &Path, tag_column: &str) -> Result<CompanyTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to parse CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let Some(tag_col) = headers.iter().position(|h| h == tag_column) else {
        bail!(
            "Tag column '{}' not found (available: {})",
            tag_column,
            headers.join(", ")
        );
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record.context("Malformed CSV record")?);
    }

    Ok(CompanyTable {
        headers,
        rows,
        tag_col,
    })
}

/// Create a CSV writer that emits a UTF-8 BOM before the header row.
fn bom_writer(path: &Path) -> Result<csv::Writer<File>> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create: {}", path.display()))?;
    file.write_all("\u{feff}".as_bytes())?;
    Ok(csv::Writer::from_writer(file))
}

/// Every co-occurrence edge: `tag1, tag2, weight`.
pub fn write_edges(path: &Path, edges: &[CoEdge]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["tag1", "tag2", "weight"])?;
    for edge in edges {
        writer.write_record([&edge.tag1, &edge.tag2, &edge.weight.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Community overview: `community_id, num_tags, num_edges, top_tags`.
pub fn write_community_summary(path: &Path, rows: &[CommunitySummary]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["community_id", "num_tags", "num_edges", "top_tags"])?;
    for row in rows {
        writer.write_record([
            &row.community_id.to_string(),
            &row.num_tags.to_string(),
            &row.num_edges.to_string(),
            &row.top_tags,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Every assigned tag with its community id, sorted by tag.
pub fn write_tag_communities(path: &Path, communities: &Communities) -> Result<()> {
    let mut pairs: Vec<(&Tag, CommunityId)> = communities
        .assignment
        .iter()
        .map(|(tag, &id)| (tag, id))
        .collect();
    pairs.sort();

    let mut writer = bom_writer(path)?;
    writer.write_record(["tag", "community_id"])?;
    for (tag, id) in pairs {
        writer.write_record([tag.to_string(), id.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// One community's edge listing, tagged with the community id.
pub fn write_community_edges(path: &Path, community_id: CommunityId, edges: &[CoEdge]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["tag1", "tag2", "weight", "community_id"])?;
    for edge in edges {
        writer.write_record([
            &edge.tag1,
            &edge.tag2,
            &edge.weight.to_string(),
            &community_id.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// The input table plus two derived columns: the community-id list in
/// structured form and as a delimited string.
pub fn write_companies_with_communities(
    path: &Path,
    table: &CompanyTable,
    lists: &[Vec<CommunityId>],
) -> Result<()> {
    let mut writer = bom_writer(path)?;
    let mut headers = table.headers.clone();
    headers.push("community_ids".to_string());
    headers.push("community_ids_str".to_string());
    writer.write_record(&headers)?;

    for (row, ids) in table.rows.iter().zip(lists) {
        let mut record: Vec<String> = row.iter().map(str::to_string).collect();
        // Short rows pad out so the derived columns stay aligned.
        record.resize(table.headers.len(), String::new());
        record.push(rollup::format_id_list(ids));
        record.push(rollup::format_id_string(ids));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Re-read the community-id lists from a previously written rollup.
/// Malformed list cells degrade to empty lists.
pub fn read_id_lists(path: &Path, column: &str) -> Result<Vec<Vec<CommunityId>>> {
    let table = read_companies(path, column)?;
    let col = table.column(column).expect("column checked by reader");
    Ok(table
        .rows
        .iter()
        .map(|row| row.get(col).map(rollup::parse_id_list).unwrap_or_default())
        .collect())
}

/// Membership share: `community_id, n_firms, pct`.
pub fn write_membership_share(path: &Path, shares: &[MembershipShare]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["community_id", "n_firms", "pct"])?;
    for share in shares {
        writer.write_record([
            &share.community_id.to_string(),
            &share.companies.to_string(),
            &format!("{:.4}", share.share_pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Tag frequency table: `tag, count`, already sorted by the caller.
pub fn write_tag_counts(path: &Path, counts: &[(Tag, u64)]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["tag", "count"])?;
    for (tag, count) in counts {
        writer.write_record([tag.to_string(), count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Tag → category audit table: `tag, category, assigned_by`.
pub fn write_tag_categories(path: &Path, rows: &[TagCategory]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(["tag", "category", "assigned_by"])?;
    for row in rows {
        writer.write_record([
            row.tag.to_string(),
            row.category.clone().unwrap_or_default(),
            row.assigned_by.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-company category annotations appended to the input table.
#[derive(Debug, Clone, Default)]
pub struct CategoryAnnotation {
    /// Distinct categories from the company's tags.
    pub categories: Vec<String>,
    /// Majority-vote primary category from tags.
    pub primary_from_tags: Option<String>,
    /// Primary category from the description text.
    pub primary_from_text: Option<String>,
    /// How the text primary was decided.
    pub text_method: String,
    /// Union of tag categories and the text primary.
    pub all_categories: Vec<String>,
}

pub fn write_companies_with_categories(
    path: &Path,
    table: &CompanyTable,
    annotations: &[CategoryAnnotation],
) -> Result<()> {
    let mut writer = bom_writer(path)?;
    let mut headers = table.headers.clone();
    headers.extend(
        [
            "categories_tags",
            "primary_from_tags",
            "primary_from_text",
            "text_method",
            "all_categories_union",
        ]
        .map(str::to_string),
    );
    writer.write_record(&headers)?;

    for (row, ann) in table.rows.iter().zip(annotations) {
        let mut record: Vec<String> = row.iter().map(str::to_string).collect();
        record.resize(table.headers.len(), String::new());
        record.push(ann.categories.join(", "));
        record.push(ann.primary_from_tags.clone().unwrap_or_default());
        record.push(ann.primary_from_text.clone().unwrap_or_default());
        record.push(ann.text_method.clone());
        record.push(ann.all_categories.join(", "));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_table_with_bom_and_resolves_tag_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        std::fs::write(&path, "\u{feff}name,tags\nAcme,\"AI, SaaS\"\nBeta,\n").unwrap();

        let table = read_companies(&path, "tags").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.raw_tags(0), Some("AI, SaaS"));
        assert_eq!(table.raw_tags(1), Some(""));
    }

    #[test]
    fn missing_tag_column_is_a_hard_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        std::fs::write(&path, "name,other\nAcme,x\n").unwrap();
        assert!(read_companies(&path, "tags").is_err());
    }

    #[test]
    fn edges_csv_round_trips_with_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        let edges = vec![CoEdge { tag1: "AI".into(), tag2: "SaaS".into(), weight: 7 }];
        write_edges(&path, &edges).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with('\u{feff}'), "BOM expected for spreadsheets");
        assert!(raw.contains("tag1,tag2,weight"));
        assert!(raw.contains("AI,SaaS,7"));
    }

    #[test]
    fn rollup_columns_parse_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("companies.csv");
        std::fs::write(&input, "name,tags\nAcme,\"a, b\"\nBeta,solo\n").unwrap();
        let table = read_companies(&input, "tags").unwrap();

        let lists = vec![vec![0, 2], vec![]];
        let out = dir.path().join("with_communities.csv");
        write_companies_with_communities(&out, &table, &lists).unwrap();

        let parsed = read_id_lists(&out, "community_ids").unwrap();
        assert_eq!(parsed, lists);
    }
}
