//! Simulation telemetry.
//!
//! Summarises one run: how much of the catalog was scheduled, how many
//! orders were carried, and how heavily each flight instance is loaded.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Units leftover | Requested units of loaded orders not assigned |
//! | Connection legs | Legs belonging to two-leg splits |
//! | Instance load | Sum of leg quantities riding an instance |
//! | Remaining | Capacity − load (negative when overbooked) |
//! | Overbooked | Instances whose load exceeds capacity |
//!
//! Orders are routed against nominal capacity one at a time, so
//! overbooking is expected and reported rather than prevented.

use std::collections::HashMap;

use serde::Serialize;

use super::AllocationBatch;
use crate::generator::GeneratedSchedule;
use crate::loader::OrderBatch;

/// Load on one flight instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceLoad {
    pub instance_id: String,
    pub capacity: u32,
    pub loaded: u32,
    pub remaining: i64,
}

impl InstanceLoad {
    /// Whether more units ride the instance than it holds.
    pub fn is_overbooked(&self) -> bool {
        self.remaining < 0
    }
}

/// Run telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationKpi {
    pub instances_scheduled: usize,
    pub instances_cancelled: usize,
    /// Orders accepted at load (destination not a hub).
    pub orders_loaded: usize,
    /// Orders rejected at load for targeting a hub.
    pub orders_rejected: usize,
    pub orders_assigned: usize,
    pub orders_dropped: usize,
    pub units_requested: u64,
    pub units_assigned: u64,
    pub units_leftover: u64,
    pub partitioned_orders: usize,
    pub connection_legs: usize,
    /// Per-instance load, in generation order.
    pub instance_loads: Vec<InstanceLoad>,
    pub overbooked_instances: usize,
}

impl AllocationKpi {
    /// Computes telemetry from the three stages of a run.
    pub fn calculate(
        schedule: &GeneratedSchedule,
        orders: &OrderBatch,
        allocation: &AllocationBatch,
    ) -> Self {
        let units_requested: u64 = orders.orders.iter().map(|o| u64::from(o.quantity)).sum();
        let units_assigned: u64 = allocation
            .assignments
            .iter()
            .map(|a| u64::from(a.total_quantity()))
            .sum();

        let mut loaded: HashMap<&str, u32> = HashMap::new();
        let mut connection_legs = 0;
        for split in allocation.assignments.iter().flat_map(|a| &a.splits) {
            if split.is_connection() {
                connection_legs += split.legs.len();
            }
            for leg in &split.legs {
                *loaded.entry(leg.instance_id.as_str()).or_insert(0) += leg.qty;
            }
        }

        let instance_loads: Vec<InstanceLoad> = schedule
            .instances
            .iter()
            .map(|inst| {
                let load = loaded.get(inst.instance_id.as_str()).copied().unwrap_or(0);
                InstanceLoad {
                    instance_id: inst.instance_id.clone(),
                    capacity: inst.capacity,
                    loaded: load,
                    remaining: i64::from(inst.capacity) - i64::from(load),
                }
            })
            .collect();
        let overbooked_instances = instance_loads.iter().filter(|l| l.is_overbooked()).count();

        Self {
            instances_scheduled: schedule.instances.len(),
            instances_cancelled: schedule.cancelled,
            orders_loaded: orders.orders.len(),
            orders_rejected: orders.rejected.len(),
            orders_assigned: allocation.assignments.len(),
            orders_dropped: allocation.dropped.len(),
            units_requested,
            units_assigned,
            units_leftover: units_requested.saturating_sub(units_assigned),
            partitioned_orders: allocation
                .assignments
                .iter()
                .filter(|a| a.is_partitioned())
                .count(),
            connection_legs,
            instance_loads,
            overbooked_instances,
        }
    }

    /// Fraction of requested units that were assigned (1.0 when nothing was requested).
    pub fn fill_rate(&self) -> f64 {
        if self.units_requested == 0 {
            1.0
        } else {
            self.units_assigned as f64 / self.units_requested as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::DroppedOrder;
    use crate::loader::RejectedOrder;
    use crate::models::clock::iso8601;
    use crate::models::{Assignment, FlightInstance, Leg, Order, Split};
    use crate::routing::DropReason;

    fn instance(id: &str, capacity: u32) -> FlightInstance {
        let dep = iso8601::parse("2025-10-20T10:00:00Z").unwrap();
        FlightInstance {
            instance_id: id.into(),
            flight_id: "MP-001".into(),
            origin: "A".into(),
            dest: "D".into(),
            dep_utc: dep,
            arr_utc: dep + chrono::Duration::hours(2),
            capacity,
        }
    }

    fn split(id: &str, qty: u32, instances: &[&str]) -> Split {
        Split {
            consignment_id: id.into(),
            qty,
            legs: instances
                .iter()
                .zip(1u32..)
                .map(|(inst, seq)| Leg {
                    seq,
                    instance_id: inst.to_string(),
                    from: "A".into(),
                    to: "D".into(),
                    qty,
                })
                .collect(),
        }
    }

    #[test]
    fn test_kpi_counts_and_overbooking() {
        let schedule = GeneratedSchedule {
            instances: vec![instance("I1", 100), instance("I2", 100), instance("I3", 50)],
            cancelled: 2,
        };
        let orders = OrderBatch {
            orders: vec![
                Order::new(1, "D", 80),
                Order::new(2, "D", 80),
                Order::new(3, "D", 30),
            ],
            rejected: vec![RejectedOrder {
                order_id: "ORD-004".into(),
                line: 4,
                destination: "A".into(),
            }],
        };
        let allocation = AllocationBatch {
            assignments: vec![
                Assignment {
                    order_id: "ORD-001".into(),
                    splits: vec![split("C-001-1", 80, &["I1"])],
                },
                Assignment {
                    order_id: "ORD-002".into(),
                    splits: vec![split("C-002-A", 40, &["I1"]), split("C-002-B", 40, &["I3", "I2"])],
                },
            ],
            dropped: vec![DroppedOrder {
                order_id: "ORD-003".into(),
                destination: "D".into(),
                quantity: 30,
                reason: DropReason::NoRoute,
            }],
        };

        let kpi = AllocationKpi::calculate(&schedule, &orders, &allocation);
        assert_eq!(kpi.instances_scheduled, 3);
        assert_eq!(kpi.instances_cancelled, 2);
        assert_eq!(kpi.orders_loaded, 3);
        assert_eq!(kpi.orders_rejected, 1);
        assert_eq!(kpi.orders_assigned, 2);
        assert_eq!(kpi.orders_dropped, 1);
        assert_eq!(kpi.units_requested, 190);
        assert_eq!(kpi.units_assigned, 160);
        assert_eq!(kpi.units_leftover, 30);
        assert_eq!(kpi.partitioned_orders, 1);
        assert_eq!(kpi.connection_legs, 2);

        assert_eq!(kpi.instance_loads[0].loaded, 120);
        assert_eq!(kpi.instance_loads[0].remaining, -20);
        assert_eq!(kpi.instance_loads[1].remaining, 60);
        assert_eq!(kpi.instance_loads[2].remaining, 10);
        assert_eq!(kpi.overbooked_instances, 1);
        assert!((kpi.fill_rate() - 160.0 / 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run() {
        let kpi = AllocationKpi::calculate(
            &GeneratedSchedule::default(),
            &OrderBatch::default(),
            &AllocationBatch::default(),
        );
        assert_eq!(kpi.units_leftover, 0);
        assert_eq!(kpi.overbooked_instances, 0);
        assert_eq!(kpi.fill_rate(), 1.0);
    }

    #[test]
    fn test_telemetry_wire_shape() {
        let kpi = AllocationKpi::calculate(
            &GeneratedSchedule {
                instances: vec![instance("I1", 10)],
                cancelled: 0,
            },
            &OrderBatch::default(),
            &AllocationBatch::default(),
        );
        let json = serde_json::to_value(&kpi).unwrap();
        assert_eq!(json["instancesScheduled"], 1);
        assert_eq!(json["instanceLoads"][0]["instanceId"], "I1");
        assert_eq!(json["instanceLoads"][0]["remaining"], 10);
    }
}
