//! Flight definitions, dated instances, and cancellations.
//!
//! A [`FlightDefinition`] is a recurring daily template expressed in local
//! clock times. A [`FlightInstance`] is one dated occurrence of it with
//! absolute UTC departure and arrival.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{self, iso8601, LocalTime};
use super::{AirportCatalog, HubSet};

/// A recurring daily flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDefinition {
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Local departure clock at the origin.
    pub departure: LocalTime,
    /// Local arrival clock at the destination.
    pub arrival: LocalTime,
    /// Cargo capacity per occurrence.
    pub capacity: u32,
}

impl FlightDefinition {
    /// Creates a definition.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: LocalTime,
        arrival: LocalTime,
        capacity: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure,
            arrival,
            capacity,
        }
    }

    /// Block time in minutes from the local clocks (next-day wrap applied).
    pub fn duration_minutes(&self) -> i64 {
        clock::duration_minutes(self.departure, self.arrival)
    }

    /// Key used by the cancellation file: `ORI-DES-HH:MM`.
    pub fn cancellation_key(&self) -> String {
        format!("{}-{}-{}", self.origin, self.destination, self.departure)
    }

    /// Whether either endpoint is a hub.
    pub fn touches_hub(&self, hubs: &HubSet) -> bool {
        hubs.contains(&self.origin) || hubs.contains(&self.destination)
    }
}

/// A cancelled occurrence: definition `flight_key` on 1-based `day`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    /// Day within the horizon (1-based).
    pub day: u32,
    /// `ORI-DES-HH:MM` of the cancelled definition.
    pub flight_key: String,
}

impl Cancellation {
    /// Creates a cancellation.
    pub fn new(day: u32, flight_key: impl Into<String>) -> Self {
        Self {
            day,
            flight_key: flight_key.into(),
        }
    }
}

/// A dated flight occurrence.
///
/// Capacity is nominal; allocation never decrements it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInstance {
    /// `<flight_id>#<depUtc>`; unique across the run.
    pub instance_id: String,
    /// `MP-NNN` sequence label.
    pub flight_id: String,
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub dest: String,
    /// UTC departure.
    #[serde(with = "iso8601")]
    pub dep_utc: DateTime<Utc>,
    /// UTC arrival.
    #[serde(with = "iso8601")]
    pub arr_utc: DateTime<Utc>,
    /// Nominal cargo capacity.
    pub capacity: u32,
}

/// Interpolated position of a flight at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Airborne (strictly between departure and arrival).
    pub active: bool,
}

impl FlightInstance {
    /// Block time.
    pub fn duration(&self) -> Duration {
        self.arr_utc - self.dep_utc
    }

    /// Whether either endpoint is a hub.
    pub fn touches_hub(&self, hubs: &HubSet) -> bool {
        hubs.contains(&self.origin) || hubs.contains(&self.dest)
    }

    /// Position at `at`, linearly interpolated between endpoint airports.
    ///
    /// Parked at the origin up to departure and at the destination from
    /// arrival on. `None` if either endpoint is missing from `airports`.
    pub fn position_at(&self, at: DateTime<Utc>, airports: &AirportCatalog) -> Option<FlightPosition> {
        let from = airports.get(&self.origin)?;
        let to = airports.get(&self.dest)?;

        if at <= self.dep_utc {
            return Some(FlightPosition {
                latitude: from.latitude,
                longitude: from.longitude,
                active: false,
            });
        }
        if at >= self.arr_utc {
            return Some(FlightPosition {
                latitude: to.latitude,
                longitude: to.longitude,
                active: false,
            });
        }

        let span = (self.arr_utc - self.dep_utc).num_milliseconds() as f64;
        let u = (at - self.dep_utc).num_milliseconds() as f64 / span;
        Some(FlightPosition {
            latitude: from.latitude + (to.latitude - from.latitude) * u,
            longitude: from.longitude + (to.longitude - from.longitude) * u,
            active: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Airport;

    fn t(h: u32, m: u32) -> LocalTime {
        LocalTime::new(h, m).unwrap()
    }

    fn instance(dep: &str, arr: &str) -> FlightInstance {
        let dep_utc = iso8601::parse(dep).unwrap();
        FlightInstance {
            instance_id: format!("MP-001#{}", iso8601::format(&dep_utc)),
            flight_id: "MP-001".into(),
            origin: "SPIM".into(),
            dest: "SKBO".into(),
            dep_utc,
            arr_utc: iso8601::parse(arr).unwrap(),
            capacity: 300,
        }
    }

    #[test]
    fn test_definition_duration_and_key() {
        let def = FlightDefinition::new("SPIM", "SKBO", t(23, 10), t(2, 40), 300);
        assert_eq!(def.duration_minutes(), 210);
        assert_eq!(def.cancellation_key(), "SPIM-SKBO-23:10");
    }

    #[test]
    fn test_definition_touches_hub() {
        let hubs = HubSet::new(["SPIM", "EBCI"]);
        assert!(FlightDefinition::new("SPIM", "SKBO", t(1, 0), t(2, 0), 1).touches_hub(&hubs));
        assert!(FlightDefinition::new("SKBO", "EBCI", t(1, 0), t(2, 0), 1).touches_hub(&hubs));
        assert!(!FlightDefinition::new("SKBO", "SEQM", t(1, 0), t(2, 0), 1).touches_hub(&hubs));
    }

    #[test]
    fn test_instance_serializes_camel_case_iso() {
        let inst = instance("2025-10-20T10:00:00Z", "2025-10-20T12:00:00Z");
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["instanceId"], "MP-001#2025-10-20T10:00:00.000Z");
        assert_eq!(json["flightId"], "MP-001");
        assert_eq!(json["depUtc"], "2025-10-20T10:00:00.000Z");
        assert_eq!(json["arrUtc"], "2025-10-20T12:00:00.000Z");
        assert_eq!(json["dest"], "SKBO");

        let back: FlightInstance = serde_json::from_value(json).unwrap();
        assert_eq!(back, inst);
    }

    #[test]
    fn test_position_interpolation() {
        let airports = AirportCatalog::new()
            .with_airport(Airport::new("SPIM").with_position(-12.0, -77.0))
            .with_airport(Airport::new("SKBO").with_position(4.0, -74.0));
        let inst = instance("2025-10-20T10:00:00Z", "2025-10-20T12:00:00Z");

        let before = inst
            .position_at(iso8601::parse("2025-10-20T09:00:00Z").unwrap(), &airports)
            .unwrap();
        assert!(!before.active);
        assert!((before.latitude + 12.0).abs() < 1e-10);

        let mid = inst
            .position_at(iso8601::parse("2025-10-20T11:00:00Z").unwrap(), &airports)
            .unwrap();
        assert!(mid.active);
        assert!((mid.latitude + 4.0).abs() < 1e-10);
        assert!((mid.longitude + 75.5).abs() < 1e-10);

        let after = inst
            .position_at(iso8601::parse("2025-10-20T12:00:00Z").unwrap(), &airports)
            .unwrap();
        assert!(!after.active);
        assert!((after.latitude - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_position_unknown_airport() {
        let inst = instance("2025-10-20T10:00:00Z", "2025-10-20T12:00:00Z");
        assert!(inst
            .position_at(inst.dep_utc, &AirportCatalog::new())
            .is_none());
    }
}
