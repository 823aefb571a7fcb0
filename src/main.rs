// Catalog Curator - CLI
//
//   catalog-curator import listings.csv   CSV → curated entries → SQLite
//   catalog-curator add --title .. --cost ..   manual entry
//   catalog-curator list | delete <id> | demo | check

use anyhow::{bail, Context, Result};
use catalog_curator::{
    delete_entry, fingerprint_exists, get_all_entries, insert_entries, insert_entry,
    load_listings_csv, open_database, verify_count, BatchReport, CatalogEntry, CategoryTag,
    CurationConfig, CurationError, CurationPipeline, RawListing,
};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const ACTOR: &str = "cli";

#[derive(Parser)]
#[command(name = "catalog-curator")]
#[command(about = "Curate marketplace listings into branded, priced catalog entries", long_about = None)]
struct Cli {
    /// SQLite catalog database
    #[arg(long, env = "CURATOR_DB", default_value = "catalog.db")]
    db: PathBuf,

    /// JSON config overriding any of the built-in tables (falls back to CURATOR_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the description picker for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Curate every row of a listings CSV and store the survivors
    Import {
        csv: PathBuf,

        /// Curate and report without writing to the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Curate a single listing entered by hand
    Add {
        #[arg(long)]
        title: String,

        /// Cost in source currency (0 = unknown)
        #[arg(long, default_value_t = 0.0)]
        cost: f64,

        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,

        #[arg(long, default_value = "")]
        colors: String,

        #[arg(long, default_value = "")]
        sizes: String,

        #[arg(long, default_value = "")]
        source_url: String,
    },

    /// List catalog entries
    List {
        /// Only this category (e.g., "beds")
        #[arg(long)]
        category: Option<CategoryTag>,
    },

    /// Delete an entry by id
    Delete { id: String },

    /// Curate a handful of built-in sample listings without storing them
    Demo,

    /// Report overlapping boilerplate phrases in the active config
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = CurationConfig::resolve(cli.config.as_deref())?;
    if let Commands::Check = cli.command {
        return run_check(&config);
    }

    let pipeline = match cli.seed {
        Some(seed) => CurationPipeline::with_seed(config, seed)?,
        None => CurationPipeline::new(config)?,
    };

    if let Commands::Demo = cli.command {
        return run_demo(&pipeline);
    }

    let conn = open_database(&cli.db)?;
    let existing = get_all_entries(&conn).context("Failed to load catalog")?;
    pipeline.rebuild_from_catalog(&existing);

    match cli.command {
        Commands::Import { csv, dry_run } => run_import(&conn, &pipeline, &csv, dry_run),
        Commands::Add {
            title,
            cost,
            images,
            colors,
            sizes,
            source_url,
        } => {
            let listing = RawListing {
                title,
                cost_in_source_currency: cost,
                image_urls: images,
                colors_text: colors,
                sizes_text: sizes,
                source_url,
                ..Default::default()
            };
            run_add(&conn, &pipeline, &listing)
        }
        Commands::List { category } => run_list(&existing, category),
        Commands::Delete { id } => run_delete(&conn, &id),
        Commands::Demo | Commands::Check => unreachable!("handled before opening the database"),
    }
}

fn run_import(conn: &Connection, pipeline: &CurationPipeline, csv: &Path, dry_run: bool) -> Result<()> {
    println!("📥 Importing listings");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let listings = load_listings_csv(csv)?;
    println!("✓ Loaded {} listings from {}", listings.len(), csv.display());

    // Stored listings are skipped before curation so they leave the name
    // rotation exactly as a restart would rebuild it
    let report = pipeline.curate_new(&listings, |fingerprint| fingerprint_exists(conn, fingerprint))?;
    print_report(&report);

    if dry_run {
        println!("Dry run: nothing stored");
        return Ok(());
    }

    let inserted = insert_entries(conn, &report.curated, ACTOR)?;
    let count = verify_count(conn)?;

    info!(inserted, duplicates = report.duplicates, total = count, "Import stored");
    println!("✓ Stored {} new entries ({} already in the catalog)", inserted, report.duplicates);
    println!("✓ Catalog contains {} entries", count);

    Ok(())
}

fn run_add(conn: &Connection, pipeline: &CurationPipeline, listing: &RawListing) -> Result<()> {
    if fingerprint_exists(conn, &listing.fingerprint())? {
        println!("✗ This listing is already in the catalog");
        return Ok(());
    }

    match pipeline.curate(listing) {
        Ok(entry) => {
            if insert_entry(conn, &entry, ACTOR)? {
                print_entry(&entry);
                println!("  id: {}", entry.id);
            } else {
                println!("✗ This listing is already in the catalog");
            }
            Ok(())
        }
        Err(err @ CurationError::Rejected { .. }) => bail!("{}", err),
        Err(err @ CurationError::BelowQuality { .. }) => bail!("{}", err),
        Err(err @ CurationError::IncompleteExtraction) => {
            bail!("{} (pass the product name with --title)", err)
        }
    }
}

fn run_list(entries: &[CatalogEntry], category: Option<CategoryTag>) -> Result<()> {
    let shown: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect();

    for entry in &shown {
        println!(
            "{}  {:<12} {:<40} AED {:>6} (was {:>6}, -{:>2}%, margin {:>3}%, score {:>3}) [{}]",
            entry.id,
            entry.category.as_str(),
            entry.curated_name,
            entry.retail_price,
            entry.was_price,
            entry.discount_percent(),
            entry.margin_percent,
            entry.quality_score,
            entry.badge
        );
    }
    println!("{} entries", shown.len());

    Ok(())
}

fn run_delete(conn: &Connection, id: &str) -> Result<()> {
    if !delete_entry(conn, id, ACTOR)? {
        bail!("No catalog entry with id {}", id);
    }

    println!("✓ Deleted {}", id);
    Ok(())
}

fn run_demo(pipeline: &CurationPipeline) -> Result<()> {
    let samples = [
        ("Hot Sale 2025 Modern Luxury Velvet Platform Bed King Size Free Shipping", 180.0),
        ("Modern Wood Leg Square Coffee Table Sets Home Center Table with Storage Drawers", 2325.0),
        ("Italian Leather Sofa Bed", 500.0),
        ("Modern Nightstand Bedside Table", 45.0),
        ("Cheap Inflatable Gaming Chair", 25.0),
        ("Carrara Marble Dining Table Set", 640.0),
    ];

    let listings: Vec<RawListing> = samples
        .iter()
        .map(|(title, cost)| RawListing::new(title, *cost))
        .collect();

    let report = pipeline.curate_batch(&listings);
    print_report(&report);

    Ok(())
}

fn run_check(config: &CurationConfig) -> Result<()> {
    let normalizer = &config.normalizer;
    println!("🔍 {} boilerplate phrases", normalizer.strip_phrases.len());

    for (longer, shorter) in normalizer.shadowed_phrases() {
        println!("  ok   '{}' is removed before '{}'", longer, shorter);
    }

    let masked = normalizer.masked_phrases();
    for (shorter, longer) in &masked {
        println!("  warn '{}' splits '{}' before it can match", shorter, longer);
    }

    if !masked.is_empty() {
        bail!("{} boilerplate phrase(s) can never match whole", masked.len());
    }

    println!("✓ No masked phrases");
    Ok(())
}

fn print_report(report: &BatchReport) {
    for entry in &report.curated {
        print_entry(entry);
    }
    for rejection in &report.rejected {
        println!("✗ {} (rejected: '{}')", rejection.title, rejection.reason);
    }
    for rejection in &report.below_quality {
        println!("✗ {} ({})", rejection.title, rejection.reason);
    }
    println!("\n{}", report.summary());
}

fn print_entry(entry: &CatalogEntry) {
    println!(
        "✓ {} [{}] AED {} (was {}, -{}%) margin {}% score {} {}",
        entry.curated_name,
        entry.category.label(),
        entry.retail_price,
        entry.was_price,
        entry.discount_percent(),
        entry.margin_percent,
        entry.quality_score,
        entry.badge
    );
}
