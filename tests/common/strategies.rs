#![allow(dead_code)]

use proptest::prelude::*;

/// Lifecycle operations that can be attempted against an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOp {
    BeginTransit,
    CompleteDelivery,
}

/// Strategy for arbitrary sequences of lifecycle operations
pub fn rule_ops_strategy() -> impl Strategy<Value = Vec<RuleOp>> {
    prop::collection::vec(
        prop_oneof![Just(RuleOp::BeginTransit), Just(RuleOp::CompleteDelivery)],
        0..12,
    )
}

/// Strategy for (order count, courier count) pairs
pub fn workload_strategy() -> impl Strategy<Value = (u64, usize)> {
    (0u64..60, 1usize..6)
}

/// Strategy for valid destination names
pub fn destination_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}( [A-Z][a-z]{2,12})?"
}
