//! rouserd - the rouser background service
//!
//! This is the main entry point for the rouserd service.
//! It wires together all the components:
//! - Configuration loading and validation
//! - Store initialization and seeding
//! - Process watcher
//! - Notification scheduler
//! - Desktop notifier

mod launch;
mod watcher;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rouser_config::{load_config, Config};
use rouser_core::Scheduler;
use rouser_notify::DesktopNotifier;
use rouser_store::{SqliteStore, Store};
use rouser_util::{default_config_path, ItemId};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use watcher::ProcessWatcher;

/// rouserd - check-in reminder service for tracked games
#[derive(Parser, Debug)]
#[command(name = "rouserd")]
#[command(about = "Check-in reminder service for tracked games", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/rouser/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set ROUSER_DATA_DIR env var)
    #[arg(short, long, env = "ROUSER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Launch a tracked item's configured command and exit
    #[arg(long, value_name = "ITEM_ID")]
    launch: Option<String>,
}

/// Main service state
struct Service {
    config: Config,
    scheduler: Scheduler,
    watcher: Arc<ProcessWatcher>,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let config = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            item_count = config.items.len(),
            "Configuration loaded"
        );

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| config.daemon.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join("rouser.db");
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        seed_store(&store, &config)?;

        let watcher = Arc::new(ProcessWatcher::new(store.clone()));
        let notifier = Arc::new(DesktopNotifier::new());
        let mut scheduler = Scheduler::new(store, notifier, watcher.clone());
        scheduler.on_status_changed(|| {
            debug!("Item status changed");
        });

        Ok(Self {
            config,
            scheduler,
            watcher,
        })
    }

    async fn run(mut self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        let mut tick_timer = tokio::time::interval(self.config.daemon.tick_interval);
        let mut refresh_timer = tokio::time::interval(self.config.daemon.status_refresh);

        info!("Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                // Tick timer - poll processes, then evaluate reminder rules
                _ = tick_timer.tick() => {
                    let now = rouser_util::now();

                    if let Err(e) = self.watcher.poll(now) {
                        warn!(error = %e, "Process poll failed");
                    }

                    self.scheduler.run_all_checks(now);
                }

                // Periodic status log
                _ = refresh_timer.tick() => {
                    let now = rouser_util::now();
                    match self.scheduler.statuses(now) {
                        Ok(statuses) => {
                            for (item, status) in statuses {
                                info!(item_id = %item.id, status = %status, "Item status");
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to compute statuses"),
                    }
                }
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}

/// Apply config to the store at startup.
///
/// The config file owns item definitions and preference values; the store
/// owns play history. Seeding replaces scheduling fields but keeps each
/// item's stored last-played timestamp, and removes items no longer in the
/// config.
fn seed_store(store: &Arc<dyn Store>, config: &Config) -> Result<()> {
    let existing = store.get_items()?;
    let configured: HashSet<&ItemId> = config.items.iter().map(|i| &i.id).collect();

    for stale in existing.iter().filter(|i| !configured.contains(&i.id)) {
        info!(item_id = %stale.id, "Removing item no longer in config");
        store.delete_item(&stale.id)?;
    }

    for item in &config.items {
        let mut seeded = item.clone();
        if let Some(prev) = existing.iter().find(|i| i.id == item.id) {
            seeded.last_played = prev.last_played;
        }
        store.upsert_item(&seeded)?;
    }

    store.save_preferences(&config.preferences)?;

    info!(item_count = config.items.len(), "Store seeded from config");
    Ok(())
}

/// One-shot mode: launch an item's configured command and exit.
fn run_launch(args: &Args, item_id: &str) -> Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let item = config
        .get_item(&ItemId::new(item_id))
        .ok_or_else(|| anyhow!("unknown item '{}'", item_id))?;

    let notifier = DesktopNotifier::new();
    launch::launch_item(
        item,
        &notifier,
        &config.preferences.notify,
        Some(&config.daemon.log_dir),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    if let Some(item_id) = &args.launch {
        return run_launch(&args, item_id);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "rouserd starting");

    let service = Service::new(&args)?;
    service.run().await
}
