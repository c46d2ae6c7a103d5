//! # Dispatch Center Runner
//!
//! Runs one simulated dispatch shift: loads configuration, starts the courier pool,
//! feeds generated orders and prints the final report as JSON. Ctrl-C requests a
//! cooperative shutdown.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};

use dispatch_center::config::ConfigManager;
use dispatch_center::logging::init_structured_logging;
use dispatch_center::orchestration::Dispatcher;

#[derive(Parser)]
#[command(name = "dispatch-center")]
#[command(about = "Simulate a dispatch center draining orders with a courier pool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Override the number of couriers
    #[arg(long)]
    couriers: Option<usize>,

    /// Override the number of generated orders
    #[arg(long)]
    orders: Option<u64>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match cli.config_dir {
        Some(dir) => ConfigManager::load_from_directory(dir),
        None => ConfigManager::load(),
    }
    .context("failed to load dispatch configuration")?;

    let mut config = manager.config().clone();
    if let Some(couriers) = cli.couriers {
        config.couriers.count = couriers;
    }
    if let Some(orders) = cli.orders {
        config.orders.count = orders;
    }
    config.logging.json |= cli.json_logs;

    init_structured_logging(&config.logging);
    info!(environment = %manager.environment(), "Dispatch center starting");

    let dispatcher = Dispatcher::new(config).context("invalid dispatch configuration")?;

    let shutdown = dispatcher.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping couriers");
            shutdown.trigger();
        }
    });

    let report = dispatcher.run_generated().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_consistent() {
        warn!(
            delivered = report.total_delivered,
            fed = report.orders_fed,
            residual = report.residual_queue_size,
            stranded = ?report.stranded_orders(),
            "Dispatch run finished with inconsistencies"
        );
        process::exit(1);
    }

    info!(delivered = report.total_delivered, "All orders delivered");
    Ok(())
}
