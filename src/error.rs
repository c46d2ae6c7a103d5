//! # Dispatch Error Types
//!
//! Structured error handling for the dispatch center using thiserror. Queue- and
//! rules-level violations are local to the courier that hit them; the orchestrator
//! only inspects post-conditions once every courier has finished.

use serde::Serialize;
use thiserror::Error;

use crate::state_machine::OrderState;

/// Errors produced by the queue, the dispatch rules, and the orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchError {
    /// Startup was requested with an unusable setting (e.g. zero couriers)
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// An order could not be constructed from its raw parts
    #[error("Invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: u64, reason: String },

    /// Enqueue attempted after the queue stopped accepting orders
    #[error("Dispatch queue is closed: order {order_id} rejected")]
    QueueClosed { order_id: u64 },

    /// The order's current state does not permit the requested transition
    #[error("Invalid transition for order {order_id}: {from} -> {to}")]
    InvalidTransition {
        order_id: u64,
        from: OrderState,
        to: OrderState,
    },

    /// The same order id reached delivery completion more than once
    #[error("Duplicate delivery detected for order {order_id}")]
    DuplicateDelivery { order_id: u64 },

    /// A courier task ended without producing a report (panic or abort)
    #[error("Courier {courier} aborted: {reason}")]
    CourierAborted { courier: String, reason: String },

    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DispatchError {
    /// Convenience constructor for configuration validation failures
    pub fn invalid_configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error signals a broken order-lifecycle invariant
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::DuplicateDelivery { .. }
        )
    }
}

impl From<config::ConfigError> for DispatchError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
