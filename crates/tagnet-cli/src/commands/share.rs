//! Community membership shares from an annotated rollup table.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tagnet_core::prelude::*;
use tagnet_report::csv_io;

pub fn run(input: &str, column: &str, output: &str) -> Result<()> {
    let lists = csv_io::read_id_lists(Path::new(input), column)?;
    let (denominator, shares) = membership_share(&lists);

    println!(
        "{} {} of {} companies belong to at least one community",
        "→".blue(),
        denominator.to_string().cyan(),
        lists.len().to_string().cyan()
    );
    for share in &shares {
        println!(
            "  community {:>3}: {:>5} firms ({:.2}%)",
            share.community_id,
            share.companies.to_string().cyan(),
            share.share_pct
        );
    }

    csv_io::write_membership_share(Path::new(output), &shares)?;

    println!();
    println!("{} Written to {}", "✓".green().bold(), output.cyan());
    Ok(())
}
