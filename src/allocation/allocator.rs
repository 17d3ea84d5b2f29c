//! Greedy order allocator.

use chrono::{DateTime, Utc};

use super::{PartitionRules, UniformSource};
use crate::models::{Assignment, Leg, Order, Split};
use crate::routing::{DropReason, Route, RouteFinder};

/// Split suffixes for partitioned orders, in route order.
const SPLIT_SUFFIXES: [&str; 3] = ["A", "B", "C"];

/// An order that could not be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedOrder {
    pub order_id: String,
    pub destination: String,
    pub quantity: u32,
    pub reason: DropReason,
}

/// Result of allocating one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    Assigned(Assignment),
    Dropped(DroppedOrder),
}

/// Result of allocating a batch of orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationBatch {
    /// Assignments in order-file order.
    pub assignments: Vec<Assignment>,
    pub dropped: Vec<DroppedOrder>,
}

/// Routes orders over a fixed instance set.
///
/// Holds no mutable state: allocating the same order twice with the same
/// draws gives the same assignment.
#[derive(Debug, Clone)]
pub struct Allocator<'a> {
    finder: RouteFinder<'a>,
    rules: PartitionRules,
    start: DateTime<Utc>,
}

impl<'a> Allocator<'a> {
    /// Creates an allocator with default partition rules.
    ///
    /// `start` anchors each order's ready instant.
    pub fn new(finder: RouteFinder<'a>, start: DateTime<Utc>) -> Self {
        Self {
            finder,
            rules: PartitionRules::default(),
            start,
        }
    }

    /// Replaces the partition rules.
    pub fn with_rules(mut self, rules: PartitionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Allocates one order.
    pub fn allocate_order(&self, order: &Order, source: &mut dyn UniformSource) -> AllocationOutcome {
        let result = match order.ready_instant(self.start) {
            None => Err(DropReason::ReadyOutOfRange),
            Some(ready) if self.rules.should_partition(order.quantity, source) => {
                self.partitioned(order, ready)
            }
            Some(ready) => self.whole(order, ready),
        };

        match result {
            Ok(splits) => AllocationOutcome::Assigned(Assignment {
                order_id: order.order_id.clone(),
                splits,
            }),
            Err(reason) => AllocationOutcome::Dropped(DroppedOrder {
                order_id: order.order_id.clone(),
                destination: order.destination.clone(),
                quantity: order.quantity,
                reason,
            }),
        }
    }

    /// Allocates `orders` in sequence.
    pub fn allocate(&self, orders: &[Order], source: &mut dyn UniformSource) -> AllocationBatch {
        let mut batch = AllocationBatch::default();
        for order in orders {
            match self.allocate_order(order, source) {
                AllocationOutcome::Assigned(a) => batch.assignments.push(a),
                AllocationOutcome::Dropped(d) => batch.dropped.push(d),
            }
        }
        batch
    }

    fn whole(&self, order: &Order, ready: DateTime<Utc>) -> Result<Vec<Split>, DropReason> {
        let route = self
            .finder
            .find_route(&order.destination, order.quantity, ready)?;
        Ok(vec![build_split(order.consignment_id("1"), order.quantity, &route)])
    }

    fn partitioned(&self, order: &Order, ready: DateTime<Utc>) -> Result<Vec<Split>, DropReason> {
        let target = self.rules.split_count(order.quantity);
        let routes = self.finder.find_routes(&order.destination, ready, target);
        if routes.is_empty() {
            return Err(DropReason::NoPartitionRoutes);
        }

        let quantities = distribute_quantity(order.quantity, routes.len());
        let splits = routes
            .iter()
            .zip(quantities)
            .zip(SPLIT_SUFFIXES)
            .filter(|((_, qty), _)| *qty > 0)
            .map(|((route, qty), suffix)| build_split(order.consignment_id(suffix), qty, route))
            .collect();
        Ok(splits)
    }
}

/// Sizes `routes` splits of `total`: each takes `ceil(total / routes)`
/// capped by what remains, so trailing splits may be smaller or zero.
pub fn distribute_quantity(total: u32, routes: usize) -> Vec<u32> {
    if routes == 0 {
        return Vec::new();
    }
    let per_split = total.div_ceil(routes as u32);
    let mut remaining = total;
    (0..routes)
        .map(|_| {
            let qty = per_split.min(remaining);
            remaining -= qty;
            qty
        })
        .collect()
}

fn build_split(consignment_id: String, qty: u32, route: &Route<'_>) -> Split {
    let legs = route
        .legs
        .iter()
        .zip(1u32..)
        .map(|(inst, seq)| Leg {
            seq,
            instance_id: inst.instance_id.clone(),
            from: inst.origin.clone(),
            to: inst.dest.clone(),
            qty,
        })
        .collect();
    Split {
        consignment_id,
        qty,
        legs,
    }
}
