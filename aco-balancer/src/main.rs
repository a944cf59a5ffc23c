/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use aco_balancer::config::AcoParams;
use aco_balancer::service::SharedSimulation;

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per server.
    Text,
    /// Full state snapshot as YAML.
    Yaml,
}

/// ACO load-balancing scheduler simulation.
///
/// Example:
///   aco-balancer -s 5 -b 10 --seed 7 --trace \
///                --config params.yaml
#[derive(Debug, Parser)]
#[command(
    name = "aco-balancer",
    about = "Ant-colony load-balancing scheduler simulation",
    long_about = None,
)]
struct Cli {
    /// Number of simulated servers.
    #[arg(short = 's', long = "servers", default_value_t = 3)]
    servers: usize,

    /// Number of random batches to generate and distribute.
    #[arg(short = 'b', long = "batches", default_value_t = 1)]
    batches: usize,

    /// Seed for batch generation and roulette draws.
    #[arg(long = "seed", default_value_t = 42)]
    seed: u64,

    /// Path to a YAML parameter file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print every decision step of every pass.
    #[arg(long = "trace", default_value_t = false)]
    trace: bool,

    /// Format of the final state report.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        servers = cli.servers,
        batches = cli.batches,
        seed    = cli.seed,
        config  = ?cli.config,
        trace   = cli.trace,
        "Configuration"
    );

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Load parameters ───────────────────────────────────────────────────────
    let params = match &cli.config {
        Some(path) => AcoParams::load_from_file(path)?,
        None => {
            warn!("No parameter file provided, using default parameters");
            AcoParams::default()
        }
    };

    let sim = SharedSimulation::new(params, cli.servers, cli.seed)
        .context("Cannot create simulation")?;

    // ── Run batches ───────────────────────────────────────────────────────────
    for round in 1..=cli.batches {
        let (batch, pass) = sim
            .generate_and_distribute()
            .await
            .with_context(|| format!("Batch {} failed", round))?;

        info!(round = round, tasks = ?batch.sizes(), "batch distributed");
        for a in &pass.assignments {
            info!("  task {:>4} → server {}", a.task, a.server + 1);
        }

        if cli.trace {
            for (i, step) in pass.steps.iter().enumerate() {
                println!("[{round}.{i:02}] {:<11} {}", step.kind(), step.message());
            }
        }
    }

    // ── Report ────────────────────────────────────────────────────────────────
    let snapshot = sim.snapshot().await;
    match cli.format {
        OutputFormat::Text => {
            let probabilities = sim.current_probabilities().await;
            for i in 0..snapshot.server_count {
                println!(
                    "server {:>2}  load {:>8.1}  pheromone {:>8.4}  next-task p {:>6.2}%",
                    i + 1,
                    snapshot.loads[i],
                    snapshot.pheromones[i],
                    probabilities[i] * 100.0
                );
            }
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&snapshot).context("Cannot serialise snapshot")?;
            print!("{yaml}");
        }
    }

    Ok(())
}
