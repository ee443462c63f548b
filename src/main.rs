//! Command-line entry point for the aggregator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ifa::pipeline::{self, RunOptions};

/// Aggregate an Instagram data export into per-contact engagement records.
#[derive(Debug, Parser)]
#[command(name = "ifa", version, about)]
struct Args {
    /// Directory containing the extracted export (the export root or its
    /// parent).
    data_dir: PathBuf,

    /// Directory to write output files into (defaults to the data
    /// directory).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base name for output files, without extension.
    #[arg(short = 'n', long, default_value = "followers_aggregated")]
    base_filename: String,

    /// Skip the JSONL export.
    #[arg(long)]
    no_jsonl: bool,

    /// Skip the spreadsheet export.
    #[arg(long)]
    no_xlsx: bool,

    /// Substring identifying the account owner in conversation
    /// participant names.
    #[arg(long, default_value = pipeline::DEFAULT_OWNER_MARKER)]
    owner_marker: String,

    /// Print progress milestones while running.
    #[arg(short, long)]
    progress: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let output_dir = args.output_dir.clone().unwrap_or_else(|| args.data_dir.clone());

    let options = RunOptions {
        base_filename: args.base_filename,
        emit_jsonl: !args.no_jsonl,
        emit_xlsx: !args.no_xlsx,
        owner_marker: args.owner_marker,
    };

    let mut print_progress = |message: &str, percent: u8| {
        println!("[{percent:>3}%] {message}");
    };
    let progress = if args.progress {
        Some(&mut print_progress as &mut dyn FnMut(&str, u8))
    } else {
        None
    };

    let summary = pipeline::run(&args.data_dir, &output_dir, &options, progress)
        .context("aggregation failed")?;

    println!("Total entries: {}", summary.total_entries);
    println!("Followers: {}", summary.followers_count);
    println!(
        "Non-followers (message requests): {}",
        summary.non_followers_count
    );
    println!(
        "Entries with interactions: {}",
        summary.entries_with_interactions
    );
    for path in &summary.output_files {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
