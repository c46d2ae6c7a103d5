//! # Order Model
//!
//! The unit of delivery work and the history of its state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DispatchError, Result};
use crate::state_machine::OrderState;

/// One recorded step of an order's lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: OrderState,
    pub to: OrderState,
    pub at: DateTime<Utc>,
}

/// Order represents a unit of delivery work.
///
/// Identity and destination are fixed at construction. The state is private and
/// only changes through [`DispatchRules`](crate::services::DispatchRules), which
/// validates every step. Orders move by value: whoever holds the `Order` is the
/// only execution able to touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: u64,
    destination: String,
    state: OrderState,
    history: Vec<StateTransition>,
}

impl Order {
    /// Create a pending order. Ids start at 1 and the destination must not be blank.
    pub fn new(id: u64, destination: impl Into<String>) -> Result<Self> {
        let destination = destination.into();

        if id == 0 {
            return Err(DispatchError::InvalidOrder {
                order_id: id,
                reason: "order id must be a positive integer".to_string(),
            });
        }

        if destination.trim().is_empty() {
            return Err(DispatchError::InvalidOrder {
                order_id: id,
                reason: "destination must not be empty".to_string(),
            });
        }

        Ok(Self {
            id,
            destination,
            state: OrderState::Pending,
            history: Vec::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Recorded transitions, oldest first
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Every state this order has been observed in, starting with `Pending`
    pub fn observed_states(&self) -> Vec<OrderState> {
        std::iter::once(OrderState::Pending)
            .chain(self.history.iter().map(|t| t.to))
            .collect()
    }

    /// Apply an already-validated transition and record it
    pub(crate) fn set_state(&mut self, next: OrderState) {
        self.history.push(StateTransition {
            from: self.state,
            to: next,
            at: Utc::now(),
        });
        self.state = next;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order{{id={}, destination='{}', state={}}}",
            self.id, self.destination, self.state
        )
    }
}
