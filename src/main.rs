use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use venue_normalizer::classifier::{ClassificationInput, TextClassifier};
use venue_normalizer::config::{AppConfig, load_config};
use venue_normalizer::geo::{GeoIndex, NeighborhoodMatch};
use venue_normalizer::model::{BusinessRecord, Coordinates, Cuisine, PriceTier, Source};
use venue_normalizer::normalizer::canonicalize_name;
use venue_normalizer::pipeline::{Pipeline, price_label};
use venue_normalizer::provider::{CandidateSource, FileSource};
use venue_normalizer::review::{
    ReviewItem, apply_overrides, load_overrides, purge_deleted, review_queue, write_override_template,
};
use venue_normalizer::search::{RestaurantQuery, find_restaurants, text_search};
use venue_normalizer::storage::SqliteStorage;
use venue_normalizer::utils::parse_datetime;

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Parser)]
#[command(author, version, about = "Normalize, classify and deduplicate venue listings", long_about = None)]
struct Cli {
    /// Config file; defaults are used when ./config.json is absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding the config
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every configured source through the pipeline
    Import,
    /// Run one JSON file through the pipeline
    ImportFile {
        /// yelp, google_places, miami_beach_api, foursquare or manual
        source: Source,
        path: PathBuf,
    },
    /// Show how a name would be classified
    Classify {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Provider category tag; repeatable
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Print the canonical form of a business name
    Canonicalize { name: String },
    /// Resolve a point to a neighborhood
    Locate {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// List records awaiting review
    Review {
        /// Only records updated at or after this RFC 3339 time
        #[arg(long)]
        since: Option<String>,
        /// Write an editable override file for the listed records
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Apply a JSON override file
    ApplyOverrides { path: PathBuf },
    /// Delete records marked with the Delete sentinel
    Purge,
    /// Search stored records
    Search {
        #[arg(long)]
        cuisine: Option<Cuisine>,
        #[arg(long)]
        neighborhood: Option<String>,
        /// Highest price tier, e.g. '$$'
        #[arg(long)]
        budget: Option<PriceTier>,
        /// Free text matched against names and cuisine synonyms
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let mut config = match resolve_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    // commands that never touch the store
    match &cli.command {
        Command::Classify {
            name,
            description,
            categories,
        } => {
            classify(&config, name, description.as_deref(), categories);
            return ExitCode::SUCCESS;
        }
        Command::Canonicalize { name } => {
            println!("{}", canonicalize_name(name));
            return ExitCode::SUCCESS;
        }
        Command::Locate { latitude, longitude } => {
            locate(&config, Coordinates::new(*latitude, *longitude));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage at {}: {}", config.database_path, e);
            return ExitCode::FAILURE;
        }
    };
    let geo = GeoIndex::miami(config.matching.neighborhood_radius_miles);

    match cli.command {
        Command::Import => {
            let mut providers: Vec<Box<dyn CandidateSource>> = Vec::new();
            for source in &config.sources {
                match source.build() {
                    Ok(provider) => providers.push(provider),
                    Err(e) => warn!("⚠️ Source {} not usable: {}", source.source(), e),
                }
            }
            if providers.is_empty() {
                warn!("⚠️ No usable sources configured");
            }
            let pipeline = Pipeline::from_config(storage, &config);
            let stats = pipeline.run(&providers).await;
            println!("{}", stats);
        }
        Command::ImportFile { source, path } => {
            let provider: Box<dyn CandidateSource> = Box::new(FileSource::new(source, path));
            let pipeline = Pipeline::from_config(storage, &config);
            let stats = pipeline.run(&[provider]).await;
            println!("{}", stats);
        }
        Command::Review { since, export } => {
            let since = match since.as_deref().map(|s| (s, parse_datetime(s))) {
                Some((raw, None)) => {
                    error!("Cannot parse --since '{}'", raw);
                    return ExitCode::FAILURE;
                }
                Some((_, parsed)) => parsed,
                None => None,
            };
            let records = match review_queue(&storage, since) {
                Ok(records) => records,
                Err(e) => {
                    error!("Failed to load the review queue: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            for record in &records {
                let item = ReviewItem::from(record);
                println!(
                    "#{:<5} {:<40} {:<20} {:<18} {}",
                    item.id,
                    item.name,
                    item.neighborhood,
                    item.primary_cuisine,
                    item.reason.as_deref().unwrap_or("-")
                );
            }
            info!("📋 {} records awaiting review", records.len());
            if let Some(path) = export {
                let written = write_override_template(&path, &records);
                if let Err(code) = or_fail(written, &format!("Failed to write {}", path.display())) {
                    return code;
                }
                info!("📝 Override template written to {}", path.display());
            }
        }
        Command::ApplyOverrides { path } => {
            let entries = match load_overrides(&path) {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Failed to read overrides from {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            let summary = apply_overrides(&storage, &geo, &entries);
            println!(
                "applied {}, marked for deletion {}, skipped {}",
                summary.applied, summary.marked_for_deletion, summary.skipped
            );
        }
        Command::Purge => match or_fail(purge_deleted(&storage), "Purge stopped") {
            Ok(purged) => println!("purged {} records", purged.len()),
            Err(code) => return code,
        },
        Command::Search {
            cuisine,
            neighborhood,
            budget,
            text,
            limit,
        } => {
            let results = match text {
                Some(text) => text_search(&storage, &text, limit),
                None => {
                    let query = RestaurantQuery {
                        cuisine,
                        neighborhood,
                        budget,
                        limit: Some(limit),
                        offset: 0,
                    };
                    find_restaurants(&storage, &geo, &query).map(|results| {
                        if !results.expanded_to.is_empty() {
                            info!("🔎 Nothing there; showing {}", results.expanded_to.join(", "));
                        }
                        results.records
                    })
                }
            };
            match or_fail(results, "Search failed") {
                Ok(records) => records.iter().for_each(print_record),
                Err(code) => return code,
            }
        }
        Command::Classify { .. } | Command::Canonicalize { .. } | Command::Locate { .. } => {}
    }

    ExitCode::SUCCESS
}

/// An explicit --config must load; the implicit ./config.json may be absent.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig, venue_normalizer::model::ConfigError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
            Ok(AppConfig::default())
        }
    }
}

fn classify(config: &AppConfig, name: &str, description: Option<&str>, categories: &[String]) {
    let classifier = TextClassifier::standard();
    let name = canonicalize_name(name);
    let input = ClassificationInput {
        name: &name,
        description,
        categories,
    };
    let found = classifier.classify(&input, config.pipeline.default_cuisine);
    let secondary = found.secondary.map(|c| format!(" + {}", c)).unwrap_or_default();
    println!("{}: {}{} ({:?})", name, found.primary, secondary, found.layer);
    if classifier.is_ultra_luxury(&name) {
        println!("price: {}", PriceTier::Five);
    }
}

fn locate(config: &AppConfig, point: Coordinates) {
    let geo = GeoIndex::miami(config.matching.neighborhood_radius_miles);
    match geo.lookup(point) {
        NeighborhoodMatch::Known { name, distance_miles } => {
            println!("{} ({:.2} mi from center)", name, distance_miles)
        }
        NeighborhoodMatch::Unknown { nearest: Some((name, miles)) } => {
            println!("Unknown (nearest {} at {:.2} mi)", name, miles)
        }
        NeighborhoodMatch::Unknown { nearest: None } => println!("Unknown"),
    }
}

fn print_record(record: &BusinessRecord) {
    let secondary = record
        .secondary_cuisine()
        .map(|c| format!(" / {}", c))
        .unwrap_or_default();
    println!(
        "#{:<5} {:<40} {:<20} {}{} {}",
        record.id,
        record.name(),
        record.neighborhood(),
        record.primary_cuisine(),
        secondary,
        price_label(record.price_tier())
    );
}

/// Logs a failed command step and hands back the exit code to return.
fn or_fail<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> Result<T, ExitCode> {
    result.map_err(|e| {
        error!("{}: {}", context, e);
        ExitCode::FAILURE
    })
}
