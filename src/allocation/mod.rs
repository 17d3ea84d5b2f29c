//! Order allocation: routing orders onto flight instances.
//!
//! Decides, per order, whether the cargo travels as one consignment or is
//! partitioned across parallel routes, then sizes each consignment.
//!
//! # Algorithm
//!
//! [`Allocator`] is a greedy single pass over the orders in file order.
//! Capacity is checked against each instance's nominal figure only; no
//! remaining-capacity ledger is kept across orders, so two orders may ride
//! the same instance. [`AllocationKpi`] reports where that overbooks.
//!
//! # Randomness
//!
//! Partition decisions draw from an injected [`UniformSource`]. Production
//! wiring uses [`RngSource`]; tests replay fixed draws with
//! [`SequenceSource`].

mod allocator;
mod kpi;
mod policy;
mod random;

pub use allocator::{distribute_quantity, AllocationBatch, AllocationOutcome, Allocator, DroppedOrder};
pub use kpi::{AllocationKpi, InstanceLoad};
pub use policy::PartitionRules;
pub use random::{RngSource, SequenceSource, UniformSource};
