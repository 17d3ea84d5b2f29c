//! Partition decision rules.

use serde::{Deserialize, Serialize};

use super::UniformSource;

/// Thresholds that decide whether and how far an order is partitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionRules {
    /// Quantities above this always partition.
    pub hard_threshold: u32,
    /// Quantities above this partition with `soft_probability`.
    pub soft_threshold: u32,
    /// Probability of a soft partition (0.0 pins it off).
    pub soft_probability: f64,
    /// Quantities above this target three splits instead of two.
    pub triple_threshold: u32,
}

impl Default for PartitionRules {
    fn default() -> Self {
        Self {
            hard_threshold: 150,
            soft_threshold: 100,
            soft_probability: 0.20,
            triple_threshold: 250,
        }
    }
}

impl PartitionRules {
    /// Decides whether to partition `quantity`.
    ///
    /// Draws from `source` only when the quantity falls in the soft band,
    /// so the draw sequence depends on the order stream alone.
    pub fn should_partition(&self, quantity: u32, source: &mut dyn UniformSource) -> bool {
        quantity > self.hard_threshold
            || (quantity > self.soft_threshold && source.next_uniform() < self.soft_probability)
    }

    /// Target split count for a partitioned order.
    pub fn split_count(&self, quantity: u32) -> usize {
        if quantity > self.triple_threshold {
            3
        } else {
            2
        }
    }
}
