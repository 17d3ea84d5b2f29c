//! Airport model.
//!
//! Airports are read-only reference data for one simulation run. Hub
//! airports are infinite cargo sources: valid leg origins and connection
//! points, never valid order destinations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    /// ICAO-like code (unique, upper-case).
    pub code: String,
    /// Hours from UTC (e.g. -5 for Lima).
    pub tz_offset: i32,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Processing capacity per window. `None` = unbounded.
    pub capacity: Option<u32>,
    /// Hub flag: never runs out of outbound cargo.
    pub infinite_source: bool,
}

impl Airport {
    /// Creates an airport at UTC with no position.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            tz_offset: 0,
            latitude: 0.0,
            longitude: 0.0,
            capacity: None,
            infinite_source: false,
        }
    }

    /// Sets the UTC offset in hours.
    pub fn with_tz_offset(mut self, tz_offset: i32) -> Self {
        self.tz_offset = tz_offset;
        self
    }

    /// Sets the geographic position.
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets the processing capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Marks this airport as a hub.
    pub fn as_hub(mut self) -> Self {
        self.infinite_source = true;
        self
    }
}

/// The configured hub airports, in route-search priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSet {
    codes: Vec<String>,
}

impl HubSet {
    /// Creates a hub set. Codes are upper-cased; duplicates keep their first position.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_uppercase();
            if !code.is_empty() && !unique.contains(&code) {
                unique.push(code);
            }
        }
        Self { codes: unique }
    }

    /// Whether `code` is a hub.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Hubs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Selects a hub from a uniform draw in `[0, 1)`.
    ///
    /// Returns `None` for an empty set.
    pub fn pick(&self, uniform: f64) -> Option<&str> {
        if self.codes.is_empty() {
            return None;
        }
        let idx = (uniform.clamp(0.0, 1.0) * self.codes.len() as f64).floor() as usize;
        self.codes
            .get(idx.min(self.codes.len() - 1))
            .map(String::as_str)
    }

    /// Number of hubs.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no hubs are configured.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Airports indexed by code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirportCatalog {
    airports: BTreeMap<String, Airport>,
}

impl AirportCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an airport.
    pub fn insert(&mut self, airport: Airport) {
        self.airports.insert(airport.code.clone(), airport);
    }

    /// Adds an airport (builder form).
    pub fn with_airport(mut self, airport: Airport) -> Self {
        self.insert(airport);
        self
    }

    /// Looks up an airport.
    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    /// UTC offset of `code`, or 0 when the airport is unknown.
    pub fn tz_offset(&self, code: &str) -> i32 {
        self.get(code).map(|a| a.tz_offset).unwrap_or(0)
    }

    /// Sets the hub flag on every airport from `hubs`.
    pub fn mark_hubs(&mut self, hubs: &HubSet) {
        for airport in self.airports.values_mut() {
            airport.infinite_source = hubs.contains(&airport.code);
        }
    }

    /// Airports in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.values()
    }

    /// Number of airports.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_builder() {
        let a = Airport::new("SPIM")
            .with_tz_offset(-5)
            .with_position(-12.02, -77.11)
            .with_capacity(440)
            .as_hub();
        assert_eq!(a.code, "SPIM");
        assert_eq!(a.tz_offset, -5);
        assert_eq!(a.capacity, Some(440));
        assert!(a.infinite_source);
        assert!((a.latitude + 12.02).abs() < 1e-10);
    }

    #[test]
    fn test_hub_set_order_and_normalization() {
        let hubs = HubSet::new(["spim", "EBCI", " UBBB ", "SPIM"]);
        assert_eq!(hubs.len(), 3);
        assert_eq!(hubs.iter().collect::<Vec<_>>(), vec!["SPIM", "EBCI", "UBBB"]);
        assert!(hubs.contains("EBCI"));
        assert!(!hubs.contains("SKBO"));
    }

    #[test]
    fn test_hub_pick_buckets() {
        let hubs = HubSet::new(["A", "B", "C"]);
        assert_eq!(hubs.pick(0.0), Some("A"));
        assert_eq!(hubs.pick(0.34), Some("B"));
        assert_eq!(hubs.pick(0.999), Some("C"));
        assert_eq!(hubs.pick(1.0), Some("C"));
        assert_eq!(HubSet::new(Vec::<String>::new()).pick(0.5), None);
    }

    #[test]
    fn test_catalog_offset_fallback() {
        let mut catalog = AirportCatalog::new()
            .with_airport(Airport::new("EBCI").with_tz_offset(2))
            .with_airport(Airport::new("SKBO").with_tz_offset(-5));
        assert_eq!(catalog.tz_offset("EBCI"), 2);
        assert_eq!(catalog.tz_offset("ZZZZ"), 0);

        catalog.mark_hubs(&HubSet::new(["EBCI"]));
        assert!(catalog.get("EBCI").unwrap().infinite_source);
        assert!(!catalog.get("SKBO").unwrap().infinite_source);
        assert_eq!(catalog.len(), 2);
    }
}
