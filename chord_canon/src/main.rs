// Chord Canon batch normalizer: CLI entry point.
//
// Reads a JSON array of songs, normalizes them in parallel, and writes a JSON
// object with the normalized songs, the failures, and the songs the
// acceptance filter turned away.
//
// Usage:
//   cargo run -p chord_canon -- songs.json [-o out.json] [--config chord_canon.toml]
//     [--skip-bad-sections] [--no-filter]
//
// Logging goes to stderr and honors RUST_LOG (default: info).

use anyhow::{Context, Result};
use chord_canon::batch::{BatchOutput, normalize_batch};
use chord_canon::config::{FailurePolicy, NormalizerConfig};
use chord_canon::normalize::Normalizer;
use chord_canon::song::Song;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "normalize")]
#[command(about = "Transpose scraped chord progressions into C major")]
struct Args {
    /// JSON file holding an array of songs
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the results (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Drop sections with unparseable chords instead of whole songs
    #[arg(long, default_value_t = false)]
    skip_bad_sections: bool,

    /// Normalize every song, even ones the acceptance filter would reject
    #[arg(long, default_value_t = false)]
    no_filter: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NormalizerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => NormalizerConfig::default(),
    };
    if args.skip_bad_sections {
        config.failure_policy = FailurePolicy::SkipSection;
    }
    if args.no_filter {
        config.filter.enabled = false;
    }

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let songs: Vec<Song> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse songs from {}", args.input.display()))?;
    info!(songs = songs.len(), policy = ?config.failure_policy, "normalizing");

    let normalizer = Normalizer::with_config(config);
    let output = BatchOutput::from_outcomes(normalize_batch(&normalizer, &songs));
    output.log_summary();

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize results")?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
