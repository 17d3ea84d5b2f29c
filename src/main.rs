use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{error, info};

use air_cargo_sched::config::SimulationConfig;
use air_cargo_sched::pipeline;
use air_cargo_sched::LoadError;

/// Air-cargo schedule generator.
#[derive(Parser)]
#[command(name = "air-cargo-sched", version, about = "Generate flight instances, cargo assignments, and event timelines")]
struct Cli {
    /// TOML configuration file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flight catalog
    #[arg(long)]
    flights: Option<PathBuf>,

    /// Order catalog
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Airport catalog
    #[arg(long)]
    airports: Option<PathBuf>,

    /// Cancellation list
    #[arg(long)]
    cancellations: Option<PathBuf>,

    /// Directory receiving the JSON payloads
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Run start, RFC 3339 (truncated to UTC midnight)
    #[arg(long)]
    start_date: Option<DateTime<Utc>>,

    /// Days to schedule
    #[arg(long)]
    days: Option<u32>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated hub codes in priority order
    #[arg(long, value_delimiter = ',')]
    hubs: Option<Vec<String>>,
}

impl Cli {
    fn into_config(self) -> Result<SimulationConfig, LoadError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(flights) = self.flights {
            config.inputs.flights = flights;
        }
        if let Some(orders) = self.orders {
            config.inputs.orders = orders;
        }
        if self.airports.is_some() {
            config.inputs.airports = self.airports;
        }
        if self.cancellations.is_some() {
            config.inputs.cancellations = self.cancellations;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(start) = self.start_date {
            config.start_date = start;
        }
        if let Some(days) = self.days {
            config.horizon_days = days;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(hubs) = self.hubs {
            config.hubs = hubs;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), LoadError> {
    let config = cli.into_config()?;
    let output = pipeline::run(&config)?;
    pipeline::write_outputs(&output, &config.output_dir)?;

    info!(
        instances = output.instances.len(),
        assignments = output.assignments.len(),
        events = output.timeline.len(),
        errors = output.report.errors,
        warnings = output.report.warnings,
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
