use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ai_closet::assets::resolve_image;
use ai_closet::ingest::{self, postprocess::postprocess, DedupPolicy};
use ai_closet::recommend::{Context, Occasion, Outfit, RegenerationSession, DEFAULT_TEMP_F};
use ai_closet::{Catalog, Config};

#[derive(Parser)]
#[command(name = "closet", version, about = "Wardrobe catalog and outfit suggestions")]
struct Cli {
    /// Catalog database path (overrides DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Images directory (overrides IMAGES_DIR)
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Dedup {
    /// Insert every row, even if its filename is already cataloged
    Always,
    /// Skip rows whose filename is already cataloged
    SkipExisting,
}

impl From<Dedup> for DedupPolicy {
    fn from(value: Dedup) -> Self {
        match value {
            Dedup::Always => DedupPolicy::AlwaysInsert,
            Dedup::SkipExisting => DedupPolicy::SkipExistingFilename,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create the catalog database and schema
    Init,
    /// Validate a tag CSV and insert its rows
    Sync {
        csv: PathBuf,
        #[arg(long, value_enum, default_value = "always")]
        dedup: Dedup,
        /// Report issues without inserting anything
        #[arg(long)]
        validate_only: bool,
    },
    /// Report problems in a tag CSV
    Validate { csv: PathBuf },
    /// Add one image, tagging it from its pixels and file name
    Add { image: PathBuf },
    /// Add every image under a folder
    Import {
        folder: PathBuf,
        #[arg(long, value_enum, default_value = "skip-existing")]
        dedup: Dedup,
    },
    /// Show the most recently added items
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Suggest outfits
    Recommend {
        /// Temperature in °F
        #[arg(long, default_value_t = DEFAULT_TEMP_F)]
        temp: f64,
        #[arg(long, default_value_t = Occasion::default())]
        occasion: Occasion,
        /// Regeneration step; 0 shows first-found order
        #[arg(long, default_value_t = 0)]
        regen: u64,
        /// How many catalog items to consider
        #[arg(long, default_value_t = 100)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Convert classifier labels into a tag CSV
    Postprocess {
        #[arg(long = "in", default_value = "data/tags_colab.csv")]
        in_csv: PathBuf,
        #[arg(long = "out", default_value = "data/tags.csv")]
        out_csv: PathBuf,
        /// Skip dominant color extraction even if images exist
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(images) = cli.images {
        config.images_dir = images;
    }

    run(cli.command, &config)
}

fn open_catalog(config: &Config) -> Result<Catalog> {
    Catalog::initialize(&config.db_path)
        .with_context(|| format!("opening catalog at {}", config.db_path.display()))
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Init => {
            let catalog = open_catalog(config)?;
            println!("Initialized catalog at {}", catalog.path().display());
        }
        Command::Validate { csv } => {
            let table = ingest::load_tags_csv(&csv)?;
            let issues = ingest::validate(&table);
            for issue in &issues {
                println!("{issue}");
            }
            println!("{} rows, {} issues", table.len(), issues.len());
        }
        Command::Sync {
            csv,
            dedup,
            validate_only,
        } => {
            let table = ingest::load_tags_csv(&csv)?;
            let issues = ingest::validate(&table);
            for issue in &issues {
                warn!("{issue}");
            }
            if validate_only {
                println!("{} rows, {} issues", table.len(), issues.len());
                return Ok(());
            }

            let catalog = open_catalog(config)?;
            let report = ingest::sync(&catalog, &table, dedup.into());
            println!(
                "Inserted {} items ({} without filename, {} duplicates, {} failed)",
                report.inserted,
                report.skipped_no_filename,
                report.skipped_duplicate,
                report.failures.len()
            );
        }
        Command::Add { image } => {
            let catalog = open_catalog(config)?;
            let item = ingest::add_image(&catalog, &config.images_dir, &image)
                .with_context(|| format!("adding {}", image.display()))?;
            println!(
                "Saved {} as {} with color {}",
                item.filename,
                item.item_type,
                item.dominant_color.as_deref().unwrap_or("unknown")
            );
        }
        Command::Import { folder, dedup } => {
            let catalog = open_catalog(config)?;
            let result =
                ingest::import_folder(&catalog, &config.images_dir, &folder, dedup.into());
            println!(
                "Import complete! Added {} images, skipped {} duplicates, {} failed.",
                result.imported, result.skipped, result.failed
            );
        }
        Command::List { limit, json } => {
            let catalog = open_catalog(config)?;
            let items = catalog.list(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No items yet. Add some with `closet add <image>`.");
            } else {
                for item in &items {
                    println!(
                        "{:>5}  {:<10} {:<18} {}",
                        item.id,
                        item.item_type,
                        item.dominant_color.as_deref().unwrap_or("-"),
                        item.filename
                    );
                }
            }
        }
        Command::Recommend {
            temp,
            occasion,
            regen,
            limit,
            json,
        } => {
            let catalog = open_catalog(config)?;
            let items = catalog.list(limit)?;
            let mut session = RegenerationSession::new(&items, Context::new(temp, occasion))?;
            session.set_counter(regen);
            let outfits = session.current();

            if json {
                println!("{}", serde_json::to_string_pretty(&outfits)?);
            } else {
                print_outfits(&outfits, config);
            }
        }
        Command::Postprocess {
            in_csv,
            out_csv,
            no_color,
        } => {
            let report = postprocess(&in_csv, &out_csv, &config.images_dir, !no_color)?;
            println!("Wrote cleaned tags to: {}", out_csv.display());
            println!("   Rows: {}", report.rows);
            if !no_color {
                println!("   Images missing locally (color skipped): {}", report.missing_images);
            }
        }
    }

    Ok(())
}

fn print_outfits(outfits: &[Outfit], config: &Config) {
    if outfits.is_empty() {
        println!("No valid outfits yet. Try adding at least one top and one bottom.");
        return;
    }

    for outfit in outfits {
        println!("- Outfit -");
        for item in &outfit.items {
            let image = resolve_image(&config.images_dir, &item.filename)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "image missing".to_string());
            println!(
                "  {} (id={}, {})  [{}]",
                item.item_type,
                item.id,
                item.dominant_color.as_deref().unwrap_or("no color"),
                image
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_defaults_match_library_context() {
        let cli = Cli::parse_from(["closet", "recommend"]);
        match cli.command {
            Command::Recommend { temp, occasion, .. } => {
                assert_eq!(Context::new(temp, occasion), Context::default());
            }
            _ => panic!("expected recommend"),
        }
    }
}
