//! Test data builders for dispatch scenarios

#![allow(dead_code)]

use dispatch_center::config::{DelayRange, DispatchConfig};
use dispatch_center::orchestration::generate_orders;

/// Builder for fast-running dispatch configurations
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    pub fn new() -> Self {
        let mut config = DispatchConfig::default();
        config.couriers.delivery_delay = DelayRange::new(1, 3);
        config.orders.arrival_delay = DelayRange::new(0, 2);
        config.shutdown.drain_timeout_ms = 10_000;
        config.shutdown.grace_timeout_ms = 1_000;
        Self { config }
    }

    pub fn with_couriers(mut self, count: usize) -> Self {
        self.config.couriers.count = count;
        self
    }

    pub fn with_delivery_delay(mut self, delay: DelayRange) -> Self {
        self.config.couriers.delivery_delay = delay;
        self
    }

    pub fn with_arrival_delay(mut self, delay: DelayRange) -> Self {
        self.config.orders.arrival_delay = delay;
        self
    }

    pub fn with_drain_timeout_ms(mut self, ms: u64) -> Self {
        self.config.shutdown.drain_timeout_ms = ms;
        self
    }

    pub fn build(self) -> DispatchConfig {
        self.config
    }
}

impl Default for DispatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` orders with ids starting at 1 and the default destinations
pub fn sample_orders(count: u64) -> Vec<(u64, String)> {
    generate_orders(count, &DispatchConfig::default().orders.destinations)
}
