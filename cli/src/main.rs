use std::{path::PathBuf, time::Instant};

use clap::Parser;
use simulator::{run_statistics, Scenario};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gauntlet")]
#[command(version)]
#[command(about = "Monte Carlo balance statistics for dice-and-card gauntlets", long_about = None)]
struct Args {
    /// Scenario file describing heroes, monsters and waves
    scenario: PathBuf,

    /// Gauntlets to run per hero
    #[arg(short, long)]
    runs: Option<usize>,

    /// Base seed for the per-run random streams
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads, defaults to the number of cores
    #[arg(short, long)]
    workers: Option<usize>,

    /// Seconds a single gauntlet may take
    #[arg(long)]
    timeout: Option<f64>,

    /// Seconds a single wave may take
    #[arg(long)]
    wave_timeout: Option<f64>,

    /// Retries after a timed out gauntlet
    #[arg(long)]
    max_retries: Option<u32>,

    /// Exchanges a single wave may take
    #[arg(long)]
    max_exchanges: Option<u32>,

    /// Exchanges a whole gauntlet may take
    #[arg(long)]
    max_total_exchanges: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)?;
    let mut request = scenario.request.clone().unwrap_or_default();
    if let Some(runs) = args.runs {
        request.runs = runs;
    }
    if let Some(seed) = args.seed {
        request.seed = seed;
    }
    if let Some(workers) = args.workers {
        request.workers = Some(workers);
    }
    if let Some(timeout) = args.timeout {
        request.timeout_seconds = timeout;
    }
    if let Some(wave_timeout) = args.wave_timeout {
        request.wave_timeout_seconds = Some(wave_timeout);
    }
    if let Some(max_retries) = args.max_retries {
        request.max_retries = max_retries;
    }
    if let Some(max_exchanges) = args.max_exchanges {
        request.max_exchanges_per_wave = Some(max_exchanges);
    }
    if let Some(max_total_exchanges) = args.max_total_exchanges {
        request.max_total_exchanges = Some(max_total_exchanges);
    }

    tracing::info!(scenario = %args.scenario.display(), runs = request.runs, "launch");
    let started = Instant::now();
    let report = run_statistics(&scenario, &request)?;
    tracing::info!(elapsed = ?started.elapsed(), "done");

    println!("{}", toml::to_string_pretty(&report)?);
    Ok(())
}
