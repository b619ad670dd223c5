//! Tally Data Generator
//!
//! Fabricates one sale and one salary per cycle, commits both to the
//! relational store, then mirrors them into the key-value store. Runs until
//! interrupted.

mod config;
mod generator;
mod synth;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::config::{DatabaseArgs, MirrorArgs};
use tally_core::logging::{install_panic_hook, LogArgs};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use config::GeneratorArgs;
use generator::Generator;

#[derive(Parser)]
#[command(name = "tally-generator")]
#[command(author, version, about = "Tally data generator - dual writes to the relational store and its key-value mirror", long_about = None)]
struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    mirror: MirrorArgs,

    #[command(flatten)]
    generator: GeneratorArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    install_panic_hook();
    if let Err(e) = cli.log.init() {
        eprintln!("[FATAL] {}", e);
        std::process::exit(1);
    }

    info!("Starting Tally generator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        error!("Generator failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli
        .generator
        .settings()
        .context("Invalid generator settings")?;

    info!("Connecting to relational store at {}...", cli.database.describe());
    let records = cli
        .database
        .connect()
        .await
        .context("Failed to connect to the relational store")?;

    info!("Connecting to key-value store...");
    let mirror = cli
        .mirror
        .connect()
        .await
        .context("Failed to connect to the key-value store")?;

    let generator = Generator::initialize(records, mirror, &settings)
        .await
        .context("Failed to prepare the relational tables")?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping generator");
                signal.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    });

    generator.run(shutdown).await;
    Ok(())
}
