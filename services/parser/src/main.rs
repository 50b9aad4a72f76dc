//! OKTMO Parser - Converts the Rosstat OKTMO registry into a JS lookup asset
//!
//! Usage:
//!   oktmo-parser [input.csv] [output.js] [--layout descriptive|compact]
//!
//! Defaults: `oktmo.csv` -> `data.js`, descriptive layout. Every option can
//! also come from the environment (or a `.env` file).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use oktmo_parser::output::SOURCE_URL;
use oktmo_parser::{convert_file, Category, ConvertOptions, Layout, LogProgress};

#[derive(Parser, Debug)]
#[command(name = "oktmo-parser", about = "Converts the OKTMO registry CSV into a JS asset")]
struct Args {
    /// Registry CSV exported from Rosstat
    #[arg(default_value = "oktmo.csv", env = "OKTMO_INPUT")]
    input: PathBuf,

    /// JS file to write
    #[arg(default_value = "data.js", env = "OKTMO_OUTPUT")]
    output: PathBuf,

    /// Record layout
    #[arg(long, value_enum, default_value_t = Layout::Descriptive, env = "OKTMO_LAYOUT")]
    layout: Layout,

    /// Field delimiter (detected from the first line when omitted)
    #[arg(long, env = "OKTMO_DELIMITER")]
    delimiter: Option<char>,

    /// Dry run - convert and report, don't write the output
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    tracing::info!("=== OKTMO Parser ===");
    tracing::info!("Input: {}", args.input.display());
    tracing::info!("Output: {}", args.output.display());
    tracing::info!("Layout: {}", args.layout.as_str());

    if !args.input.exists() {
        tracing::error!("Download the registry from {}", SOURCE_URL);
        anyhow::bail!(
            "Input file {} not found. Usage: oktmo-parser <input.csv> [output.js]",
            args.input.display()
        );
    }

    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => anyhow::bail!("Delimiter must be a single ASCII character, got {:?}", c),
        None => None,
    };
    let options = ConvertOptions { delimiter };

    let conversion = convert_file(&args.input, &options, &mut LogProgress)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    let stats = &conversion.stats;
    tracing::info!("Processing complete:");
    tracing::info!("  Processed: {}", stats.processed);
    tracing::info!("  Skipped: {}", stats.skipped);
    tracing::info!("  Total records: {}", conversion.records.len());
    for category in Category::ALL {
        tracing::info!("  {}: {}", category.label(), stats.by_category(category));
    }

    for (i, record) in conversion.records.iter().take(5).enumerate() {
        let short_name: String = record.name.chars().take(50).collect();
        tracing::info!(
            "  [{}] {} | {} | type {} | region {}",
            i + 1,
            record.code,
            short_name,
            record.category.code(),
            record.region
        );
    }

    tracing::info!("Regions found: {}", conversion.regions.len());
    for (code, name) in conversion.regions.iter().take(10) {
        tracing::info!("  {}: {}", code, name);
    }

    if args.dry_run {
        tracing::info!("Dry run - nothing written");
        return Ok(());
    }

    conversion
        .write_to(&args.output, args.layout)
        .context("Failed to save output")?;

    tracing::info!("=== Conversion Complete ===");
    tracing::info!("Saved {}", args.output.display());
    Ok(())
}
