//! # Lifecycle States
//!
//! Order and courier states with their legal transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle states. The lifecycle is strictly linear:
/// `Pending -> InTransit -> Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Order is waiting in the staging area
    #[default]
    Pending,
    /// A courier has picked the order up
    InTransit,
    /// Delivery completed and recorded in the ledger
    Delivered,
}

impl OrderState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// The only legal successor of this state, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InTransit),
            Self::InTransit => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Check whether moving to `target` is a single legal step forward
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InTransit => write!(f, "in_transit"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for OrderState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!(
                "Invalid order state: {s}. Use: pending, in_transit, delivered"
            )),
        }
    }
}

/// Courier worker lifecycle: `Starting -> Running -> (Terminated | Failed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourierState {
    /// Task spawned but the loop has not begun
    #[default]
    Starting,
    /// Draining the queue
    Running,
    /// Stopped cleanly: end of stream or cooperative cancellation
    Terminated,
    /// Stopped after a broken order invariant
    Failed,
}

impl CourierState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }

    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Starting, Self::Running)
                | (Self::Running, Self::Terminated)
                | (Self::Running, Self::Failed)
        )
    }
}

impl fmt::Display for CourierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Terminated => write!(f, "terminated"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_state_only_advances_one_step() {
        assert!(OrderState::Pending.can_transition_to(OrderState::InTransit));
        assert!(OrderState::InTransit.can_transition_to(OrderState::Delivered));

        assert!(!OrderState::Pending.can_transition_to(OrderState::Delivered));
        assert!(!OrderState::InTransit.can_transition_to(OrderState::Pending));
        assert!(!OrderState::Delivered.can_transition_to(OrderState::InTransit));
        assert!(!OrderState::Pending.can_transition_to(OrderState::Pending));

        assert_eq!(OrderState::Delivered.next(), None);
        assert!(OrderState::Delivered.is_terminal());
        assert!(!OrderState::InTransit.is_terminal());
    }

    #[test]
    fn test_order_state_string_round_trip() {
        for state in [
            OrderState::Pending,
            OrderState::InTransit,
            OrderState::Delivered,
        ] {
            assert_eq!(OrderState::from_str(&state.to_string()).unwrap(), state);
        }
        assert_eq!(
            OrderState::from_str("  IN_TRANSIT ").unwrap(),
            OrderState::InTransit
        );

        let err = OrderState::from_str("lost").unwrap_err();
        assert!(err.contains("pending, in_transit, delivered"));
    }

    #[test]
    fn test_courier_state_lifecycle() {
        let state = CourierState::default();
        assert_eq!(state, CourierState::Starting);
        assert!(state.can_transition_to(CourierState::Running));
        assert!(!state.can_transition_to(CourierState::Terminated));

        assert!(CourierState::Running.can_transition_to(CourierState::Failed));
        assert!(CourierState::Running.can_transition_to(CourierState::Terminated));
        assert!(!CourierState::Failed.can_transition_to(CourierState::Running));
        assert!(CourierState::Failed.is_terminal());
        assert!(!CourierState::Running.is_terminal());
    }
}
