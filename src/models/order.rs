//! Order model and id sequencing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::clock::utc_midnight;

/// A monotonically increasing 1-based counter.
///
/// Passed in and returned by value so id generation stays reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    next: u32,
}

impl Sequence {
    /// A counter whose first value is 1.
    pub fn start() -> Self {
        Self { next: 1 }
    }

    /// A counter whose first value is `next`.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Returns the current value and the advanced counter.
    #[must_use]
    pub fn take(self) -> (u32, Self) {
        (self.next, Self { next: self.next + 1 })
    }

    /// The value the next `take` will return.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::start()
    }
}

/// A delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD-NNN`.
    pub order_id: String,
    /// Position in the order file (1-based); source of the id digits.
    pub sequence: u32,
    /// Day within the horizon (1-based).
    pub day: u32,
    /// Creation hour (treated as UTC).
    pub hour: u32,
    /// Creation minute (treated as UTC).
    pub minute: u32,
    /// Hub the cargo ships from, drawn once at load.
    pub origin: String,
    /// Delivery airport (never a hub).
    pub destination: String,
    /// Requested units.
    pub quantity: u32,
    /// Client identifier.
    pub client_id: String,
}

impl Order {
    /// Latest creation day an order file may name.
    pub const MAX_DAY: u32 = 3660;

    /// Creates an order whose id derives from `sequence`.
    pub fn new(sequence: u32, destination: impl Into<String>, quantity: u32) -> Self {
        Self {
            order_id: Self::id_for(sequence),
            sequence,
            day: 1,
            hour: 0,
            minute: 0,
            origin: String::new(),
            destination: destination.into(),
            quantity,
            client_id: String::new(),
        }
    }

    /// `ORD-NNN` for a sequence value.
    pub fn id_for(sequence: u32) -> String {
        format!("ORD-{sequence:03}")
    }

    /// Sets the creation day and clock.
    pub fn at(mut self, day: u32, hour: u32, minute: u32) -> Self {
        self.day = day;
        self.hour = hour;
        self.minute = minute;
        self
    }

    /// Sets the origin hub.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the client id.
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Instant from which the order may board: `start` advanced by
    /// `day - 1` days, clock set to `hour:minute` UTC. No timezone shift.
    ///
    /// `None` when the instant falls outside the representable range.
    pub fn ready_instant(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let offset = Duration::days(i64::from(self.day) - 1)
            + Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute));
        utc_midnight(start).checked_add_signed(offset)
    }

    /// Consignment id for a split suffix: `C-NNN-<suffix>`.
    pub fn consignment_id(&self, suffix: &str) -> String {
        format!("C-{:03}-{suffix}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::iso8601;

    #[test]
    fn test_sequence_threads_by_value() {
        let seq = Sequence::start();
        let (a, seq) = seq.take();
        let (b, seq) = seq.take();
        assert_eq!((a, b), (1, 2));
        assert_eq!(seq.peek(), 3);
        assert_eq!(Sequence::starting_at(40).take().0, 40);
    }

    #[test]
    fn test_order_ids() {
        let order = Order::new(7, "SKBO", 50);
        assert_eq!(order.order_id, "ORD-007");
        assert_eq!(order.consignment_id("1"), "C-007-1");
        assert_eq!(order.consignment_id("B"), "C-007-B");
        assert_eq!(Order::new(1234, "SKBO", 1).order_id, "ORD-1234");
    }

    #[test]
    fn test_ready_instant() {
        let start = iso8601::parse("2025-10-20T00:00:00Z").unwrap();
        let order = Order::new(1, "SKBO", 10).at(3, 9, 45);
        assert_eq!(
            iso8601::format(&order.ready_instant(start).unwrap()),
            "2025-10-22T09:45:00.000Z"
        );
    }

    #[test]
    fn test_ready_instant_ignores_start_clock() {
        let start = iso8601::parse("2025-10-20T13:00:00Z").unwrap();
        let order = Order::new(1, "SKBO", 10).at(1, 9, 0);
        assert_eq!(
            iso8601::format(&order.ready_instant(start).unwrap()),
            "2025-10-20T09:00:00.000Z"
        );
    }

    #[test]
    fn test_ready_instant_out_of_range_is_none() {
        let start = iso8601::parse("2025-10-20T00:00:00Z").unwrap();
        let order = Order::new(1, "SKBO", 10).at(u32::MAX, 9, 0);
        assert!(order.ready_instant(start).is_none());
        assert!(Order::new(1, "SKBO", 10)
            .at(Order::MAX_DAY, 23, 59)
            .ready_instant(start)
            .is_some());
    }
}
