//! Placer metadata tool
//!
//! Inspects and edits the persisted metadata of a placement manager.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use placer_common::{BackendKind, Config};
use placer_meta::{open_store, summarize};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "placer-meta")]
#[command(about = "Placer metadata inspection tool")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/placer/meta.toml")]
    config: PathBuf,

    /// Data directory holding the metadata database
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use the in-memory backend instead of the configured one
    #[arg(long)]
    memory: bool,

    /// Keys requested per range scan during bulk loads
    #[arg(long)]
    range_limit: Option<usize>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load everything and print counts
    Summary {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Read or write the GC safe point
    SafePoint {
        #[command(subcommand)]
        action: SafePointAction,
    },
    /// Set the scheduling weights of a store
    StoreWeight {
        store_id: u64,
        leader_weight: f64,
        region_weight: f64,
    },
}

#[derive(Subcommand, Debug)]
enum SafePointAction {
    Get,
    Set { safe_point: u64 },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;

    // Command line overrides the file
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if args.memory {
        config.storage.backend = BackendKind::Memory;
    }
    if let Some(range_limit) = args.range_limit {
        config.storage.range_limit = range_limit;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = open_store(&config)?;

    match args.command {
        Command::Summary { json } => {
            let summary = summarize(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                match summary.cluster_id {
                    Some(id) => println!("cluster:        {id}"),
                    None => println!("cluster:        <not bootstrapped>"),
                }
                println!(
                    "stores:         {} (up {}, offline {}, tombstone {})",
                    summary.stores,
                    summary.stores_up,
                    summary.stores_offline,
                    summary.stores_tombstone
                );
                println!("weighted:       {:?}", summary.weighted_stores);
                println!("regions:        {}", summary.regions);
                println!("gc safe point:  {}", summary.gc_safe_point);
            }
        }
        Command::SafePoint { action } => match action {
            SafePointAction::Get => println!("{}", store.load_gc_safe_point()?),
            SafePointAction::Set { safe_point } => {
                let current = store.load_gc_safe_point()?;
                store.save_gc_safe_point(safe_point)?;
                info!(current, safe_point, "GC safe point updated");
            }
        },
        Command::StoreWeight {
            store_id,
            leader_weight,
            region_weight,
        } => {
            if store.load_store(store_id)?.is_none() {
                warn!(store_id, "Store has no persisted record, saving weights anyway");
            }
            store.save_store_weight(store_id, leader_weight, region_weight)?;
            info!(store_id, leader_weight, region_weight, "Store weights saved");
        }
    }

    Ok(())
}
