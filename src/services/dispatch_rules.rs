//! # Dispatch Rules
//!
//! Business rules for moving an order through its lifecycle. The only shared state
//! is the delivery ledger: a concurrent set of completed order ids whose `insert`
//! is the single atomic check-and-set used to detect duplicate deliveries.

use dashmap::DashSet;
use tracing::{debug, warn};

use crate::error::{DispatchError, Result};
use crate::models::Order;
use crate::state_machine::OrderState;

/// Validates transitions and records completed deliveries
#[derive(Debug, Default)]
pub struct DispatchRules {
    delivered: DashSet<u64>,
}

impl DispatchRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an order as picked up. Requires `Pending`.
    pub fn begin_transit(&self, order: &mut Order) -> Result<()> {
        Self::guard_transition(order, OrderState::InTransit)?;
        order.set_state(OrderState::InTransit);
        debug!(order_id = order.id(), "Order in transit");
        Ok(())
    }

    /// Mark an order as delivered. Requires `InTransit` and an id that has not
    /// been delivered before.
    ///
    /// On [`DispatchError::DuplicateDelivery`] the order keeps its `InTransit`
    /// state and the ledger is unchanged.
    pub fn complete_delivery(&self, order: &mut Order) -> Result<()> {
        Self::guard_transition(order, OrderState::Delivered)?;

        if !self.delivered.insert(order.id()) {
            warn!(order_id = order.id(), "Duplicate delivery detected");
            return Err(DispatchError::DuplicateDelivery {
                order_id: order.id(),
            });
        }

        order.set_state(OrderState::Delivered);
        debug!(order_id = order.id(), "Order delivered");
        Ok(())
    }

    /// Number of distinct orders delivered so far; never decreases
    pub fn total_delivered(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_delivered(&self, order_id: u64) -> bool {
        self.delivered.contains(&order_id)
    }

    /// Sorted snapshot of the ledger
    pub fn delivered_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.delivered.iter().map(|id| *id).collect();
        ids.sort_unstable();
        ids
    }

    fn guard_transition(order: &Order, target: OrderState) -> Result<()> {
        let current = order.state();
        if current.can_transition_to(target) {
            Ok(())
        } else {
            Err(DispatchError::InvalidTransition {
                order_id: order.id(),
                from: current,
                to: target,
            })
        }
    }
}
