//! Simulation configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the standard one-week run over the three default hubs. The CLI overrides
//! individual fields after the file is read.
//!
//! ```
//! use air_cargo_sched::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_toml_str("horizon_days = 3\nhubs = [\"A\", \"B\"]").unwrap();
//! assert_eq!(config.horizon_days, 3);
//! assert_eq!(config.hub_set().len(), 2);
//! assert_eq!(config.connection_window_hours, 12);
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::PartitionRules;
use crate::error::LoadError;
use crate::models::clock::{iso8601, utc_midnight};
use crate::models::HubSet;

/// Default hub airports, in route-search priority order.
pub const DEFAULT_HUBS: [&str; 3] = ["SPIM", "EBCI", "UBBB"];

/// Longest horizon a run may schedule.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Default simulation start.
pub const DEFAULT_START_DATE: &str = "2025-10-20T00:00:00Z";

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    /// Flight catalog.
    pub flights: PathBuf,
    /// Order catalog.
    pub orders: PathBuf,
    /// Airport catalog. Absent = every offset falls back to 0.
    pub airports: Option<PathBuf>,
    /// Cancellation list. Absent = nothing cancelled.
    pub cancellations: Option<PathBuf>,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            flights: PathBuf::from("data/vuelos.txt"),
            orders: PathBuf::from("data/pedidos.txt"),
            airports: None,
            cancellations: None,
        }
    }
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hub airport codes in priority order.
    pub hubs: Vec<String>,
    /// Days to expand the weekly catalog over.
    pub horizon_days: u32,
    /// Run start; truncated to UTC midnight on use.
    #[serde(with = "iso8601")]
    pub start_date: DateTime<Utc>,
    /// Longest wait between connecting legs.
    pub connection_window_hours: i64,
    /// Partition thresholds.
    pub partition: PartitionRules,
    /// RNG seed. `None` = seeded from the OS.
    pub seed: Option<u64>,
    /// Input files.
    pub inputs: InputPaths,
    /// Directory receiving the JSON payloads.
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hubs: DEFAULT_HUBS.iter().map(|h| h.to_string()).collect(),
            horizon_days: 7,
            start_date: default_start_date(),
            connection_window_hours: 12,
            partition: PartitionRules::default(),
            seed: None,
            inputs: InputPaths::default(),
            output_dir: PathBuf::from("public"),
        }
    }
}

fn default_start_date() -> DateTime<Utc> {
    DEFAULT_START_DATE
        .parse::<DateTime<Utc>>()
        .unwrap_or_default()
}

impl SimulationConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(raw: &str) -> Result<Self, LoadError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Rejects configurations no run can use.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.hub_set().is_empty() {
            return Err(LoadError::Config("at least one hub is required".into()));
        }
        if self.horizon_days == 0 {
            return Err(LoadError::Config("horizon_days must be positive".into()));
        }
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(LoadError::Config(format!(
                "horizon_days must not exceed {MAX_HORIZON_DAYS}"
            )));
        }
        if self.connection_window_hours <= 0 {
            return Err(LoadError::Config(
                "connection_window_hours must be positive".into(),
            ));
        }
        let horizon_hours = i64::from(self.horizon_days) * 24;
        if self.connection_window_hours > horizon_hours {
            return Err(LoadError::Config(format!(
                "connection_window_hours must not exceed the horizon ({horizon_hours} h)"
            )));
        }
        if !(0.0..=1.0).contains(&self.partition.soft_probability) {
            return Err(LoadError::Config(
                "partition.soft_probability must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Hubs as a lookup set.
    pub fn hub_set(&self) -> HubSet {
        HubSet::new(&self.hubs)
    }

    /// Start instant truncated to UTC midnight.
    pub fn start_midnight(&self) -> DateTime<Utc> {
        utc_midnight(self.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SimulationConfig::default();
        assert_eq!(c.hubs, vec!["SPIM", "EBCI", "UBBB"]);
        assert_eq!(c.horizon_days, 7);
        assert_eq!(iso8601::format(&c.start_date), "2025-10-20T00:00:00.000Z");
        assert_eq!(c.partition.hard_threshold, 150);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides() {
        let raw = r#"
            hubs = ["a", "b"]
            start_date = "2025-11-03T15:30:00Z"
            seed = 7

            [partition]
            soft_probability = 0.0

            [inputs]
            flights = "in/flights.txt"
            cancellations = "in/cancel.txt"
        "#;
        let c = SimulationConfig::from_toml_str(raw).unwrap();
        assert_eq!(c.hub_set().iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.partition.soft_probability, 0.0);
        assert_eq!(c.partition.hard_threshold, 150);
        assert_eq!(c.inputs.flights, PathBuf::from("in/flights.txt"));
        assert_eq!(c.inputs.orders, PathBuf::from("data/pedidos.txt"));
        assert_eq!(
            iso8601::format(&c.start_midnight()),
            "2025-11-03T00:00:00.000Z"
        );
    }

    #[test]
    fn test_rejects_empty_hubs() {
        let err = SimulationConfig::from_toml_str("hubs = []").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let err = SimulationConfig::from_toml_str("horizon_days = 0").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_rejects_horizon_beyond_limit() {
        let err = SimulationConfig::from_toml_str("horizon_days = 100000").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
        assert!(SimulationConfig::from_toml_str("horizon_days = 366").is_ok());
    }

    #[test]
    fn test_rejects_connection_window_beyond_horizon() {
        let err = SimulationConfig::from_toml_str("connection_window_hours = 9000000000000")
            .unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));

        let err = SimulationConfig::from_toml_str("horizon_days = 1\nconnection_window_hours = 25")
            .unwrap_err();
        assert!(err.to_string().contains("24 h"));
        assert!(
            SimulationConfig::from_toml_str("horizon_days = 1\nconnection_window_hours = 24").is_ok()
        );
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = SimulationConfig::from_toml_str("horizon_days = \"x\"").unwrap_err();
        assert!(matches!(err, LoadError::ConfigParse(_)));
    }
}
