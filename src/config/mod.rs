//! # Dispatch Configuration
//!
//! Typed configuration for a dispatch run. Every section carries `#[serde(default)]`
//! so partial files and environment overrides merge over the built-in defaults.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dispatch_center::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let couriers = manager.config().couriers.count;
//! let pacing = manager.config().orders.arrival_delay;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::defaults;
use crate::error::{DispatchError, Result};

pub use loader::ConfigManager;

/// Inclusive millisecond range used for simulated latencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields `ms`
    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    /// Draw a uniformly distributed delay from the range
    pub fn sample(&self) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }

    pub fn validate(&self, field: &str) -> Result<()> {
        if self.min_ms > self.max_ms {
            return Err(DispatchError::invalid_configuration(
                field,
                format!(
                    "min_ms ({}) must not exceed max_ms ({})",
                    self.min_ms, self.max_ms
                ),
            ));
        }
        Ok(())
    }
}

/// Courier pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    /// Number of concurrent couriers; must be at least one
    pub count: usize,
    /// Simulated time spent delivering each order
    pub delivery_delay: DelayRange,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            count: defaults::COURIER_COUNT,
            delivery_delay: DelayRange::new(
                defaults::DELIVERY_DELAY_MIN_MS,
                defaults::DELIVERY_DELAY_MAX_MS,
            ),
        }
    }
}

/// Order feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFeedConfig {
    /// Number of orders generated by the default scenario
    pub count: u64,
    /// Pause between consecutive arrivals
    pub arrival_delay: DelayRange,
    /// Destinations cycled through by generated orders
    pub destinations: Vec<String>,
}

impl Default for OrderFeedConfig {
    fn default() -> Self {
        Self {
            count: defaults::ORDER_COUNT,
            arrival_delay: DelayRange::new(
                defaults::ARRIVAL_DELAY_MIN_MS,
                defaults::ARRIVAL_DELAY_MAX_MS,
            ),
            destinations: defaults::DESTINATIONS
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
        }
    }
}

/// Shutdown bounds for awaiting couriers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long couriers get to drain the closed queue on their own
    pub drain_timeout_ms: u64,
    /// How long couriers get to unwind after cancellation before being abandoned
    pub grace_timeout_ms: u64,
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn grace_timeout(&self) -> Duration {
        Duration::from_millis(self.grace_timeout_ms)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_ms: defaults::DRAIN_TIMEOUT_MS,
            grace_timeout_ms: defaults::GRACE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `dispatch_center=debug`; `RUST_LOG` wins
    pub level: Option<String>,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
}

/// Root configuration for a dispatch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub couriers: CourierConfig,
    pub orders: OrderFeedConfig,
    pub shutdown: ShutdownConfig,
    pub logging: LoggingConfig,
}

impl DispatchConfig {
    /// Validate the configuration, failing on the first unusable setting
    pub fn validate(&self) -> Result<()> {
        validate_courier_count(self.couriers.count)?;
        self.couriers
            .delivery_delay
            .validate("couriers.delivery_delay")?;

        if self.orders.count == 0 {
            return Err(DispatchError::invalid_configuration(
                "orders.count",
                "at least one order is required",
            ));
        }
        self.orders.arrival_delay.validate("orders.arrival_delay")?;

        if self.orders.destinations.is_empty() {
            return Err(DispatchError::invalid_configuration(
                "orders.destinations",
                "at least one destination is required",
            ));
        }
        if let Some(index) = self
            .orders
            .destinations
            .iter()
            .position(|d| d.trim().is_empty())
        {
            return Err(DispatchError::invalid_configuration(
                "orders.destinations",
                format!("destination at index {index} is blank"),
            ));
        }

        if self.shutdown.drain_timeout_ms == 0 {
            return Err(DispatchError::invalid_configuration(
                "shutdown.drain_timeout_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Reject pools that could never drain the queue
pub fn validate_courier_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(DispatchError::invalid_configuration(
            "couriers.count",
            "at least one courier is required",
        ));
    }
    Ok(())
}
