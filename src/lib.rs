//! Air-cargo scheduling engine.
//!
//! Expands a weekly flight catalog into dated UTC flight instances, routes
//! delivery orders from hub airports onto them (partitioning large orders
//! across parallel routes), derives the consignment event timeline, and
//! cross-checks the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `FlightDefinition`, `FlightInstance`,
//!   `Airport`, `Order`, `Assignment`, `TimelineEvent`
//! - **`loader`**: Parsers for the flight, order, airport, and cancellation files
//! - **`generator`**: Catalog expansion with timezone conversion and cancellations
//! - **`routing`**: Direct and hub-connection route search
//! - **`allocation`**: Partition policy, order allocator, run telemetry
//! - **`timeline`**: Consignment event stream
//! - **`validation`**: Non-blocking coherence checks
//! - **`pipeline`**: The end-to-end batch and its JSON outputs
//!
//! # Example
//!
//! ```
//! use air_cargo_sched::allocation::{Allocator, SequenceSource};
//! use air_cargo_sched::generator::generate_instances;
//! use air_cargo_sched::models::clock::iso8601;
//! use air_cargo_sched::models::{AirportCatalog, FlightDefinition, HubSet, LocalTime, Order, Sequence};
//! use air_cargo_sched::routing::RouteFinder;
//!
//! let start = iso8601::parse("2025-10-20T00:00:00Z").unwrap();
//! let defs = vec![FlightDefinition::new(
//!     "SPIM",
//!     "SKBO",
//!     LocalTime::new(10, 0).unwrap(),
//!     LocalTime::new(12, 0).unwrap(),
//!     100,
//! )];
//! let (schedule, _) =
//!     generate_instances(&defs, &AirportCatalog::new(), start, 7, &[], Sequence::start());
//!
//! let hubs = HubSet::new(["SPIM", "EBCI", "UBBB"]);
//! let allocator = Allocator::new(RouteFinder::new(&schedule.instances, &hubs), start);
//! let order = Order::new(1, "SKBO", 200).at(1, 9, 0);
//! let batch = allocator.allocate(&[order], &mut SequenceSource::default());
//!
//! assert_eq!(batch.assignments[0].splits.len(), 2);
//! ```

pub mod allocation;
pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod routing;
pub mod timeline;
pub mod validation;

pub use error::LoadError;
