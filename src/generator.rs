//! Flight instance generator.
//!
//! Expands the weekly catalog into dated UTC flight instances.
//!
//! # Algorithm
//!
//! For each day offset `0..horizon`, for each definition in catalog order:
//! 1. Skip the pair if it is cancelled for day `offset + 1`.
//! 2. Departure = origin-local clock on `start + offset` converted to UTC.
//! 3. Arrival = departure + local block time (next-day wrap applied).
//! 4. Take the next value of the run-wide counter for `MP-NNN`.
//!
//! The counter is never reset per day or per definition, so the flight id
//! alone repeats nowhere and the instance id (`MP-NNN#<depUtc>`) is unique.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::models::clock::{self, iso8601};
use crate::models::{AirportCatalog, Cancellation, FlightDefinition, FlightInstance, Sequence};

/// Output of one expansion.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSchedule {
    /// Instances ordered by (day, catalog position).
    pub instances: Vec<FlightInstance>,
    /// Occurrences suppressed by cancellations.
    pub cancelled: usize,
}

/// `MP-NNN` for a counter value.
pub fn flight_id_for(counter: u32) -> String {
    format!("MP-{counter:03}")
}

/// Expands `definitions` over `horizon_days` starting at `start` (UTC midnight).
///
/// Unknown airports fall back to offset 0. Returns the schedule and the
/// advanced counter.
pub fn generate_instances(
    definitions: &[FlightDefinition],
    airports: &AirportCatalog,
    start: DateTime<Utc>,
    horizon_days: u32,
    cancellations: &[Cancellation],
    mut counter: Sequence,
) -> (GeneratedSchedule, Sequence) {
    let cancelled_keys: HashSet<(u32, &str)> = cancellations
        .iter()
        .map(|c| (c.day, c.flight_key.as_str()))
        .collect();
    let base = clock::utc_midnight(start).date_naive();

    let mut schedule = GeneratedSchedule {
        instances: Vec::with_capacity(definitions.len() * horizon_days as usize),
        cancelled: 0,
    };

    for day_offset in 0..horizon_days {
        let Some(date) = base.checked_add_signed(Duration::days(i64::from(day_offset))) else {
            break;
        };

        for def in definitions {
            let key = def.cancellation_key();
            if cancelled_keys.contains(&(day_offset + 1, key.as_str())) {
                schedule.cancelled += 1;
                continue;
            }

            let dep_utc = clock::local_to_utc(date, def.departure, airports.tz_offset(&def.origin));
            let arr_utc = dep_utc + Duration::minutes(def.duration_minutes());

            let (value, next) = counter.take();
            counter = next;
            let flight_id = flight_id_for(value);

            schedule.instances.push(FlightInstance {
                instance_id: format!("{flight_id}#{}", iso8601::format(&dep_utc)),
                flight_id,
                origin: def.origin.clone(),
                dest: def.destination.clone(),
                dep_utc,
                arr_utc,
                capacity: def.capacity,
            });
        }
    }

    info!(
        instances = schedule.instances.len(),
        cancelled = schedule.cancelled,
        days = horizon_days,
        "flight instances generated"
    );
    (schedule, counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Airport, LocalTime};
    use std::collections::HashSet;

    fn t(h: u32, m: u32) -> LocalTime {
        LocalTime::new(h, m).unwrap()
    }

    fn start() -> DateTime<Utc> {
        iso8601::parse("2025-10-20T00:00:00Z").unwrap()
    }

    fn catalog() -> Vec<FlightDefinition> {
        vec![
            FlightDefinition::new("A", "D", t(10, 0), t(12, 0), 100),
            FlightDefinition::new("B", "A", t(23, 0), t(1, 30), 200),
        ]
    }

    #[test]
    fn test_counter_is_global_across_days() {
        let (s, next) = generate_instances(
            &catalog(),
            &AirportCatalog::new(),
            start(),
            3,
            &[],
            Sequence::start(),
        );
        assert_eq!(s.instances.len(), 6);
        let ids: Vec<&str> = s.instances.iter().map(|i| i.flight_id.as_str()).collect();
        assert_eq!(ids, vec!["MP-001", "MP-002", "MP-003", "MP-004", "MP-005", "MP-006"]);
        assert_eq!(next.peek(), 7);

        // Day-major order.
        assert_eq!(s.instances[0].origin, "A");
        assert_eq!(s.instances[1].origin, "B");
        assert_eq!(s.instances[2].origin, "A");
        assert_eq!(
            s.instances[2].instance_id,
            "MP-003#2025-10-21T10:00:00.000Z"
        );
    }

    #[test]
    fn test_instance_ids_unique() {
        let (s, _) = generate_instances(
            &catalog(),
            &AirportCatalog::new(),
            start(),
            7,
            &[],
            Sequence::start(),
        );
        let unique: HashSet<&str> = s.instances.iter().map(|i| i.instance_id.as_str()).collect();
        assert_eq!(unique.len(), 14);
    }

    #[test]
    fn test_next_day_arrival_and_duration() {
        let (s, _) = generate_instances(
            &catalog(),
            &AirportCatalog::new(),
            start(),
            1,
            &[],
            Sequence::start(),
        );
        let overnight = &s.instances[1];
        assert_eq!(iso8601::format(&overnight.dep_utc), "2025-10-20T23:00:00.000Z");
        assert_eq!(iso8601::format(&overnight.arr_utc), "2025-10-21T01:30:00.000Z");
        for inst in &s.instances {
            assert!(inst.arr_utc > inst.dep_utc);
        }
    }

    #[test]
    fn test_timezone_applied_to_departure_only() {
        // Origin at UTC+4, destination at UTC-5: duration still comes from local clocks.
        let airports = AirportCatalog::new()
            .with_airport(Airport::new("A").with_tz_offset(4))
            .with_airport(Airport::new("D").with_tz_offset(-5));
        let defs = vec![FlightDefinition::new("A", "D", t(2, 0), t(6, 0), 10)];
        let (s, _) = generate_instances(&defs, &airports, start(), 1, &[], Sequence::start());

        let inst = &s.instances[0];
        assert_eq!(iso8601::format(&inst.dep_utc), "2025-10-19T22:00:00.000Z");
        assert_eq!(inst.duration().num_minutes(), 240);
    }

    #[test]
    fn test_cancellation_skips_without_consuming_counter() {
        let cancels = vec![Cancellation::new(2, "A-D-10:00")];
        let (s, next) = generate_instances(
            &catalog(),
            &AirportCatalog::new(),
            start(),
            2,
            &cancels,
            Sequence::start(),
        );
        assert_eq!(s.cancelled, 1);
        assert_eq!(s.instances.len(), 3);
        assert_eq!(s.instances[2].origin, "B");
        assert_eq!(s.instances[2].flight_id, "MP-003");
        assert_eq!(next.peek(), 4);
    }

    #[test]
    fn test_counter_threads_between_runs() {
        let (_, next) = generate_instances(
            &catalog(),
            &AirportCatalog::new(),
            start(),
            1,
            &[],
            Sequence::start(),
        );
        let (s, _) = generate_instances(&catalog(), &AirportCatalog::new(), start(), 1, &[], next);
        assert_eq!(s.instances[0].flight_id, "MP-003");
    }
}
