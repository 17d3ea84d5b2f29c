//! Timeline builder.
//!
//! Derives the consignment event stream from assignments.
//!
//! # Algorithm
//!
//! For every leg of every split, in assignment order:
//!
//! | Event | Timestamp |
//! |-------|-----------|
//! | `WAIT_START` | departure − 50 min |
//! | `WAIT_END` | departure − 5 min |
//! | `LOAD` | departure |
//! | `ARRIVAL` | arrival |
//! | `PICKUP_READY` | arrival, last leg of the split only |
//!
//! The list is then stable-sorted by timestamp, so events sharing a
//! timestamp keep generation order. Legs whose instance is unknown emit
//! nothing.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{Assignment, EventKind, FlightInstance, TimelineEvent};

/// Lead time of `WAIT_START` before departure.
pub const WAIT_START_LEAD_MINUTES: i64 = 50;
/// Lead time of `WAIT_END` before departure.
pub const WAIT_END_LEAD_MINUTES: i64 = 5;

/// Builds the sorted event timeline.
pub fn build_timeline(assignments: &[Assignment], instances: &[FlightInstance]) -> Vec<TimelineEvent> {
    let by_id: HashMap<&str, &FlightInstance> = instances
        .iter()
        .map(|i| (i.instance_id.as_str(), i))
        .collect();

    let mut events = Vec::new();
    for assignment in assignments {
        for split in &assignment.splits {
            let last = split.legs.len();
            for (idx, leg) in split.legs.iter().enumerate() {
                let Some(inst) = by_id.get(leg.instance_id.as_str()) else {
                    continue;
                };
                let mut push = |ts: DateTime<Utc>, kind: EventKind| {
                    events.push(TimelineEvent::new(
                        ts,
                        kind,
                        assignment.order_id.as_str(),
                        split.consignment_id.as_str(),
                    ));
                };

                push(
                    inst.dep_utc - Duration::minutes(WAIT_START_LEAD_MINUTES),
                    EventKind::WaitStart {
                        airport: leg.from.clone(),
                    },
                );
                push(
                    inst.dep_utc - Duration::minutes(WAIT_END_LEAD_MINUTES),
                    EventKind::WaitEnd {
                        airport: leg.from.clone(),
                    },
                );
                push(
                    inst.dep_utc,
                    EventKind::Load {
                        instance_id: leg.instance_id.clone(),
                        from: leg.from.clone(),
                        to: leg.to.clone(),
                        qty: leg.qty,
                    },
                );
                push(
                    inst.arr_utc,
                    EventKind::Arrival {
                        instance_id: leg.instance_id.clone(),
                        from: leg.from.clone(),
                        to: leg.to.clone(),
                        qty: leg.qty,
                        at: leg.to.clone(),
                    },
                );
                if idx + 1 == last {
                    push(
                        inst.arr_utc,
                        EventKind::PickupReady {
                            at: leg.to.clone(),
                            qty: leg.qty,
                        },
                    );
                }
            }
        }
    }

    // Vec::sort_by_key is stable.
    events.sort_by_key(|e| e.ts);
    events
}
