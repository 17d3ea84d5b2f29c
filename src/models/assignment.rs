//! Assignment (allocation result) model.
//!
//! An [`Assignment`] records how one order travels: one or more
//! consignment [`Split`]s, each riding an ordered list of [`Leg`]s.

use serde::{Deserialize, Serialize};

/// One flight segment of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// 1-based position within the split.
    pub seq: u32,
    /// Flight instance ridden.
    pub instance_id: String,
    pub from: String,
    pub to: String,
    /// Units carried; always the split's quantity.
    pub qty: u32,
}

/// A consignment routed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    /// `C-NNN-1` or `C-NNN-A`, `C-NNN-B`, ...
    pub consignment_id: String,
    pub qty: u32,
    pub legs: Vec<Leg>,
}

impl Split {
    /// Airport where the last leg lands.
    pub fn final_destination(&self) -> Option<&str> {
        self.legs.last().map(|l| l.to.as_str())
    }

    /// Whether this split changes planes at a hub.
    pub fn is_connection(&self) -> bool {
        self.legs.len() > 1
    }
}

/// Allocation of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub order_id: String,
    pub splits: Vec<Split>,
}

impl Assignment {
    /// Sum of split quantities.
    pub fn total_quantity(&self) -> u32 {
        self.splits.iter().map(|s| s.qty).sum()
    }

    /// Whether the order was partitioned across several splits.
    pub fn is_partitioned(&self) -> bool {
        self.splits.len() > 1
    }

    /// Consignment ids in split order.
    pub fn consignment_ids(&self) -> impl Iterator<Item = &str> {
        self.splits.iter().map(|s| s.consignment_id.as_str())
    }

    /// Every leg of every split.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.splits.iter().flat_map(|s| s.legs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(seq: u32, id: &str, from: &str, to: &str, qty: u32) -> Leg {
        Leg {
            seq,
            instance_id: id.into(),
            from: from.into(),
            to: to.into(),
            qty,
        }
    }

    fn sample() -> Assignment {
        Assignment {
            order_id: "ORD-001".into(),
            splits: vec![
                Split {
                    consignment_id: "C-001-A".into(),
                    qty: 84,
                    legs: vec![leg(1, "MP-001#x", "SPIM", "SKBO", 84)],
                },
                Split {
                    consignment_id: "C-001-B".into(),
                    qty: 83,
                    legs: vec![
                        leg(1, "MP-002#x", "EBCI", "SPIM", 83),
                        leg(2, "MP-003#x", "SPIM", "SKBO", 83),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_assignment_queries() {
        let a = sample();
        assert_eq!(a.total_quantity(), 167);
        assert!(a.is_partitioned());
        assert_eq!(a.consignment_ids().collect::<Vec<_>>(), vec!["C-001-A", "C-001-B"]);
        assert_eq!(a.legs().count(), 3);
        assert_eq!(a.splits[1].final_destination(), Some("SKBO"));
        assert!(a.splits[1].is_connection());
        assert!(!a.splits[0].is_connection());
    }

    #[test]
    fn test_assignment_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["orderId"], "ORD-001");
        assert_eq!(json["splits"][1]["consignmentId"], "C-001-B");
        assert_eq!(json["splits"][1]["legs"][1]["seq"], 2);
        assert_eq!(json["splits"][1]["legs"][1]["instanceId"], "MP-003#x");
        assert_eq!(json["splits"][1]["legs"][1]["from"], "SPIM");
    }
}
