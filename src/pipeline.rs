//! End-to-end batch run.
//!
//! load → generate instances → allocate → build timeline → validate → persist.
//! One sequential pass; only input reads and output writes can fail.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};

use crate::allocation::{AllocationKpi, Allocator, RngSource, UniformSource};
use crate::config::SimulationConfig;
use crate::error::LoadError;
use crate::generator::generate_instances;
use crate::loader::{self, OrderBatch};
use crate::models::{AirportCatalog, Assignment, Cancellation, FlightDefinition, FlightInstance, Sequence, TimelineEvent};
use crate::routing::RouteFinder;
use crate::timeline::build_timeline;
use crate::validation::{validate_coherence, CoherenceReport};

/// Flight instances payload.
pub const INSTANCES_FILE: &str = "flight_instances_icao.json";
/// Assignments payload.
pub const ASSIGNMENTS_FILE: &str = "assignments_split_icao.json";
/// Timeline payload.
pub const TIMELINE_FILE: &str = "timeline_split_icao.json";
/// Coherence report payload.
pub const REPORT_FILE: &str = "validation_report.json";
/// Telemetry payload.
pub const TELEMETRY_FILE: &str = "telemetry.json";

/// Parsed input catalogs.
#[derive(Debug, Clone, Default)]
pub struct SimulationInputs {
    pub definitions: Vec<FlightDefinition>,
    pub orders: OrderBatch,
    pub airports: AirportCatalog,
    pub cancellations: Vec<Cancellation>,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub instances: Vec<FlightInstance>,
    pub assignments: Vec<Assignment>,
    pub timeline: Vec<TimelineEvent>,
    pub report: CoherenceReport,
    pub kpi: AllocationKpi,
}

/// Reads and parses the input files named by `config`.
///
/// Origin hubs are drawn from `source` while orders load.
pub fn load_inputs(
    config: &SimulationConfig,
    source: &mut dyn UniformSource,
) -> Result<SimulationInputs, LoadError> {
    let hubs = config.hub_set();
    let paths = &config.inputs;

    let definitions = loader::parse_flight_definitions(&loader::read_input(&paths.flights)?, &hubs)?;
    let (orders, _) = loader::parse_orders(
        &loader::read_input(&paths.orders)?,
        &hubs,
        source,
        Sequence::start(),
    )?;
    let airports = match &paths.airports {
        Some(path) => loader::parse_airports(&loader::read_input(path)?, &hubs)?,
        None => AirportCatalog::new(),
    };
    let cancellations = match &paths.cancellations {
        Some(path) => loader::parse_cancellations(&loader::read_input(path)?)?,
        None => Vec::new(),
    };

    info!(
        definitions = definitions.len(),
        orders = orders.orders.len(),
        airports = airports.len(),
        cancellations = cancellations.len(),
        "inputs loaded"
    );
    Ok(SimulationInputs {
        definitions,
        orders,
        airports,
        cancellations,
    })
}

/// Runs every stage after loading. Never fails.
pub fn simulate(
    config: &SimulationConfig,
    inputs: &SimulationInputs,
    source: &mut dyn UniformSource,
) -> SimulationOutput {
    let hubs = config.hub_set();
    let start = config.start_midnight();

    let (schedule, _) = generate_instances(
        &inputs.definitions,
        &inputs.airports,
        start,
        config.horizon_days,
        &inputs.cancellations,
        Sequence::start(),
    );

    let finder = RouteFinder::new(&schedule.instances, &hubs)
        .with_connection_window(
            Duration::try_hours(config.connection_window_hours).unwrap_or(Duration::MAX),
        );
    let allocator = Allocator::new(finder, start).with_rules(config.partition.clone());
    let allocation = allocator.allocate(&inputs.orders.orders, source);

    for dropped in &allocation.dropped {
        warn!(
            order_id = %dropped.order_id,
            dest = %dropped.destination,
            qty = dropped.quantity,
            reason = %dropped.reason,
            "order dropped"
        );
    }
    info!(
        assigned = allocation.assignments.len(),
        dropped = allocation.dropped.len(),
        "orders allocated"
    );

    let timeline = build_timeline(&allocation.assignments, &schedule.instances);
    info!(events = timeline.len(), "timeline built");

    let report = validate_coherence(
        &schedule.instances,
        &allocation.assignments,
        &timeline,
        &hubs,
        config.horizon_days,
    );
    let kpi = AllocationKpi::calculate(&schedule, &inputs.orders, &allocation);
    if kpi.overbooked_instances > 0 {
        info!(
            overbooked = kpi.overbooked_instances,
            "instances loaded beyond nominal capacity"
        );
    }

    SimulationOutput {
        instances: schedule.instances,
        assignments: allocation.assignments,
        timeline,
        report,
        kpi,
    }
}

/// Loads inputs and simulates, seeding randomness from `config.seed`.
pub fn run(config: &SimulationConfig) -> Result<SimulationOutput, LoadError> {
    config.validate()?;
    let mut source = match config.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let inputs = load_inputs(config, &mut source)?;
    Ok(simulate(config, &inputs, &mut source))
}

/// Writes every payload into `dir`, creating it if needed.
///
/// Returns the written paths.
pub fn write_outputs(output: &SimulationOutput, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    fs::create_dir_all(dir).map_err(|source| LoadError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let written = vec![
        write_json(dir, INSTANCES_FILE, &output.instances)?,
        write_json(dir, ASSIGNMENTS_FILE, &output.assignments)?,
        write_json(dir, TIMELINE_FILE, &output.timeline)?,
        write_json(dir, REPORT_FILE, &output.report)?,
        write_json(dir, TELEMETRY_FILE, &output.kpi)?,
    ];
    info!(dir = %dir.display(), files = written.len(), "outputs written");
    Ok(written)
}

/// Serializes `value` in full, then swaps it into place through a sibling temp file.
fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<PathBuf, LoadError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let path = dir.join(name);
    let tmp = dir.join(format!(".{name}.tmp"));

    fs::write(&tmp, bytes).map_err(|source| LoadError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| LoadError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
