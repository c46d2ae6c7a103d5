//! # Dispatcher
//!
//! Orchestrates one dispatch run: starts the courier pool against a shared queue
//! and rules instance, feeds orders with simulated arrival pacing, closes the
//! queue, and waits for every courier to finish.
//!
//! Post-conditions (nothing left buffered, every fed order delivered, no failed
//! couriers) are checked once all couriers are done and reported as warnings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{validate_courier_count, DispatchConfig};
use crate::error::{DispatchError, Result};
use crate::logging::log_order_operation;
use crate::messaging::DispatchQueue;
use crate::models::Order;
use crate::services::DispatchRules;

use super::courier::{Courier, CourierHandle, CourierOutcome, CourierReport};
use super::roster::{courier_names, generate_orders};
use super::shutdown::ShutdownSignal;

/// Outcome of a complete dispatch run
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub run_id: Uuid,
    pub orders_fed: u64,
    pub total_delivered: usize,
    pub residual_queue_size: usize,
    pub couriers: Vec<CourierReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchReport {
    /// Couriers that failed or had to be abandoned
    pub fn unhealthy_couriers(&self) -> usize {
        self.couriers
            .iter()
            .filter(|c| c.outcome != CourierOutcome::Terminated)
            .count()
    }

    /// Orders left in transit by cancellation, sorted by id
    pub fn stranded_orders(&self) -> Vec<u64> {
        let mut stranded: Vec<u64> = self.couriers.iter().filter_map(|c| c.stranded).collect();
        stranded.sort_unstable();
        stranded
    }

    /// True when every fed order was delivered, nothing remains buffered and all
    /// couriers terminated cleanly
    pub fn is_consistent(&self) -> bool {
        self.residual_queue_size == 0
            && self.total_delivered as u64 == self.orders_fed
            && self.unhealthy_couriers() == 0
    }
}

/// Owns startup, feeding, closure and the shutdown wait for a courier pool
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatchConfig,
    queue: Arc<DispatchQueue>,
    rules: Arc<DispatchRules>,
    shutdown: ShutdownSignal,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self> {
        Self::with_shutdown(config, ShutdownSignal::new())
    }

    /// Create a dispatcher bound to an externally owned shutdown signal
    pub fn with_shutdown(config: DispatchConfig, shutdown: ShutdownSignal) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            queue: Arc::new(DispatchQueue::new()),
            rules: Arc::new(DispatchRules::new()),
            shutdown,
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }

    pub fn rules(&self) -> &Arc<DispatchRules> {
        &self.rules
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Start `courier_count` couriers with generated names.
    ///
    /// Fails with [`DispatchError::InvalidConfiguration`] for zero couriers,
    /// before anything is spawned.
    pub fn start(&self, courier_count: usize) -> Result<Vec<CourierHandle>> {
        validate_courier_count(courier_count)?;
        self.start_named(courier_names(courier_count))
    }

    /// Start one courier per name
    pub fn start_named(&self, names: Vec<String>) -> Result<Vec<CourierHandle>> {
        validate_courier_count(names.len())?;

        info!(couriers = names.len(), "Starting couriers");
        let handles = names
            .into_iter()
            .map(|name| {
                Courier::new(
                    name,
                    self.queue.clone(),
                    self.rules.clone(),
                    self.config.couriers.delivery_delay,
                    self.shutdown.clone(),
                )
                .spawn()
            })
            .collect();
        Ok(handles)
    }

    /// Enqueue orders one at a time, pausing a sampled arrival delay between them.
    ///
    /// The pause holds no lock, so couriers keep draining. Feeding stops early if
    /// shutdown is requested; the number of orders actually enqueued is returned.
    #[instrument(skip(self, orders))]
    pub async fn feed<I>(&self, orders: I) -> Result<u64>
    where
        I: IntoIterator<Item = (u64, String)>,
    {
        let mut fed = 0;
        let mut orders = orders.into_iter().peekable();

        while let Some((id, destination)) = orders.next() {
            if self.shutdown.is_triggered() {
                warn!(fed = fed, "Shutdown requested; feeding stopped early");
                break;
            }

            let order = Order::new(id, destination)?;
            let destination = order.destination().to_string();
            self.queue.enqueue(order)?;
            fed += 1;
            log_order_operation("arrived", id, &destination, "pending", None);

            if orders.peek().is_some() {
                let pause = self.config.orders.arrival_delay.sample();
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => {}
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        info!(fed = fed, "Order feed complete");
        Ok(fed)
    }

    /// Close the queue and wait for every courier to reach a terminal state.
    ///
    /// Couriers get `shutdown.drain_timeout_ms` to drain on their own. Past that,
    /// shutdown is triggered and they get `shutdown.grace_timeout_ms` to unwind;
    /// any still running are aborted and reported as abandoned.
    #[instrument(skip(self, handles), fields(couriers = handles.len()))]
    pub async fn close_and_await(&self, handles: Vec<CourierHandle>) -> Vec<CourierReport> {
        self.queue.close();

        let drain_deadline = Instant::now() + self.config.shutdown.drain_timeout();
        let mut grace_deadline: Option<Instant> = None;
        let mut reports = Vec::with_capacity(handles.len());

        for mut handle in handles {
            if grace_deadline.is_none() {
                match tokio::time::timeout_at(drain_deadline, &mut handle.join).await {
                    Ok(joined) => {
                        reports.push(Self::collect(&handle, joined));
                        continue;
                    }
                    Err(_) => {
                        warn!(
                            courier = %handle.name(),
                            "Couriers did not drain in time; requesting shutdown"
                        );
                        self.shutdown.trigger();
                        grace_deadline =
                            Some(Instant::now() + self.config.shutdown.grace_timeout());
                    }
                }
            }

            let deadline = grace_deadline.unwrap_or(drain_deadline);
            match tokio::time::timeout_at(deadline, &mut handle.join).await {
                Ok(joined) => reports.push(Self::collect(&handle, joined)),
                Err(_) => {
                    error!(courier = %handle.name(), "Courier ignored shutdown; abandoning");
                    handle.join.abort();
                    reports.push(CourierReport::abandoned(
                        handle.id(),
                        handle.name().to_string(),
                    ));
                }
            }
        }

        info!(reports = reports.len(), "All couriers finished");
        reports
    }

    /// Run a full scenario: start the configured pool, feed `orders`, close and
    /// await, then verify post-conditions.
    pub async fn run<I>(&self, orders: I) -> Result<DispatchReport>
    where
        I: IntoIterator<Item = (u64, String)>,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(run_id = %run_id, couriers = self.config.couriers.count, "Dispatch run starting");

        let handles = self.start(self.config.couriers.count)?;
        let fed = self.feed(orders).await;
        let couriers = self.close_and_await(handles).await;

        let orders_fed = match fed {
            Ok(fed) => fed,
            Err(err) => {
                error!(run_id = %run_id, error = %err, "Order feed aborted");
                return Err(err);
            }
        };

        let report = DispatchReport {
            run_id,
            orders_fed,
            total_delivered: self.rules.total_delivered(),
            residual_queue_size: self.queue.size(),
            couriers,
            started_at,
            finished_at: Utc::now(),
        };
        Self::verify(&report);
        Ok(report)
    }

    /// Run the scenario described by the configuration's `orders` section
    pub async fn run_generated(&self) -> Result<DispatchReport> {
        let orders = generate_orders(self.config.orders.count, &self.config.orders.destinations);
        self.run(orders).await
    }

    fn collect(
        handle: &CourierHandle,
        joined: std::result::Result<CourierReport, tokio::task::JoinError>,
    ) -> CourierReport {
        match joined {
            Ok(report) => report,
            Err(join_error) => {
                error!(courier = %handle.name(), error = %join_error, "Courier task died");
                CourierReport::aborted(handle.id(), handle.name().to_string(), &join_error)
            }
        }
    }

    fn verify(report: &DispatchReport) {
        if report.residual_queue_size != 0 {
            warn!(
                residual = report.residual_queue_size,
                "Orders remain in the dispatch queue"
            );
        }
        if report.total_delivered as u64 != report.orders_fed {
            warn!(
                delivered = report.total_delivered,
                expected = report.orders_fed,
                "Delivered count does not match orders fed"
            );
        }
        for courier in report.couriers.iter().filter(|c| c.failure.is_some()) {
            warn!(
                courier = %courier.name,
                failure = ?courier.failure.as_ref().map(DispatchError::to_string),
                "Courier stopped on a failure"
            );
        }
        if report.is_consistent() {
            info!(
                run_id = %report.run_id,
                delivered = report.total_delivered,
                "All orders delivered"
            );
        }
    }
}
