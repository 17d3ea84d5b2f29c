//! Timeline event model.
//!
//! Events are derived data: they are recomputed from assignments and
//! flight instances and have no lifecycle of their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::iso8601;

/// A consignment lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(with = "iso8601")]
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
    pub order_id: String,
    pub consignment_id: String,
}

/// Event kind with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Consignment starts waiting at `airport`.
    WaitStart { airport: String },
    /// Consignment stops waiting at `airport`.
    WaitEnd { airport: String },
    /// Consignment boards a flight.
    #[serde(rename_all = "camelCase")]
    Load {
        instance_id: String,
        from: String,
        to: String,
        qty: u32,
    },
    /// Flight carrying the consignment lands at `at`.
    #[serde(rename_all = "camelCase")]
    Arrival {
        instance_id: String,
        from: String,
        to: String,
        qty: u32,
        at: String,
    },
    /// Consignment is ready for the client at its final airport.
    PickupReady { at: String, qty: u32 },
}

impl EventKind {
    /// Wire name (`WAIT_START`, `LOAD`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::WaitStart { .. } => "WAIT_START",
            EventKind::WaitEnd { .. } => "WAIT_END",
            EventKind::Load { .. } => "LOAD",
            EventKind::Arrival { .. } => "ARRIVAL",
            EventKind::PickupReady { .. } => "PICKUP_READY",
        }
    }

    /// Instance referenced by the event, if any.
    pub fn instance_id(&self) -> Option<&str> {
        match self {
            EventKind::Load { instance_id, .. } | EventKind::Arrival { instance_id, .. } => {
                Some(instance_id.as_str())
            }
            _ => None,
        }
    }
}

impl TimelineEvent {
    /// Creates an event.
    pub fn new(
        ts: DateTime<Utc>,
        kind: EventKind,
        order_id: impl Into<String>,
        consignment_id: impl Into<String>,
    ) -> Self {
        Self {
            ts,
            kind,
            order_id: order_id.into(),
            consignment_id: consignment_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        iso8601::parse("2025-10-20T09:10:00Z").unwrap()
    }

    #[test]
    fn test_wait_event_wire_shape() {
        let e = TimelineEvent::new(
            ts(),
            EventKind::WaitStart {
                airport: "SPIM".into(),
            },
            "ORD-001",
            "C-001-1",
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["ts"], "2025-10-20T09:10:00.000Z");
        assert_eq!(json["type"], "WAIT_START");
        assert_eq!(json["airport"], "SPIM");
        assert_eq!(json["orderId"], "ORD-001");
        assert_eq!(json["consignmentId"], "C-001-1");
    }

    #[test]
    fn test_arrival_wire_shape_and_back() {
        let e = TimelineEvent::new(
            ts(),
            EventKind::Arrival {
                instance_id: "MP-001#t".into(),
                from: "SPIM".into(),
                to: "SKBO".into(),
                qty: 50,
                at: "SKBO".into(),
            },
            "ORD-001",
            "C-001-1",
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "ARRIVAL");
        assert_eq!(json["instanceId"], "MP-001#t");
        assert_eq!(json["at"], "SKBO");
        assert_eq!(json["qty"], 50);

        let back: TimelineEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
        assert_eq!(back.kind.instance_id(), Some("MP-001#t"));
        assert_eq!(back.kind.name(), "ARRIVAL");
    }

    #[test]
    fn test_pickup_has_no_instance() {
        let kind = EventKind::PickupReady {
            at: "SKBO".into(),
            qty: 5,
        };
        assert_eq!(kind.instance_id(), None);
        assert_eq!(kind.name(), "PICKUP_READY");
    }
}
