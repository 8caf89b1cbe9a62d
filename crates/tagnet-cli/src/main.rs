//! Tagnet CLI - tag co-occurrence network analysis for startup metadata.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tagnet")]
#[command(author, version, about = "Tagnet - tag co-occurrence network analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: tagnet.toml in current or parent directories)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract, count, detect communities, render
    Analyze {
        /// Input CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,

        /// Overall view edge-weight threshold (overrides config)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Louvain resolution parameter (overrides config)
        #[arg(short, long)]
        resolution: Option<f64>,
    },

    /// Count tag frequencies across companies
    Count {
        /// Input CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Output CSV path
        #[arg(short, long, default_value = "tag_count.csv")]
        output: String,
    },

    /// Classify tags and companies into business categories
    Categorize {
        /// Input CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Column holding the company description text
        #[arg(short, long, default_value = "description")]
        text_column: String,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report community membership shares from an annotated rollup
    Share {
        /// Rollup CSV produced by `tagnet analyze`
        input: String,

        /// Column holding the community-id lists
        #[arg(long, default_value = "community_ids")]
        column: String,

        /// Output CSV path
        #[arg(short, long, default_value = "community_membership_share.csv")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            threshold,
            resolution,
        } => commands::analyze::run(&config, input, output, threshold, resolution),
        Commands::Count { input, output } => commands::count::run(&config, input, &output),
        Commands::Categorize {
            input,
            text_column,
            output,
        } => commands::categorize::run(&config, input, &text_column, output),
        Commands::Share {
            input,
            column,
            output,
        } => commands::share::run(&input, &column, &output),
    }
}
