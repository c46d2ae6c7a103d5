//! # Courier Worker Loop
//!
//! A courier is one spawned task that drains the shared [`DispatchQueue`]: it takes
//! the head order, marks it in transit, spends a simulated delivery delay, and
//! records the delivery. It stops when the queue reports end of stream
//! (`Terminated`), when shutdown is requested (`Terminated`, leaving an in-flight
//! order in transit), or when the dispatch rules reject an order (`Failed`).
//!
//! A rejected order means an invariant broke somewhere else, so the courier never
//! retries it. Sibling couriers keep draining the queue.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::DelayRange;
use crate::error::DispatchError;
use crate::logging::{log_courier_operation, log_order_operation};
use crate::messaging::{Dequeued, DispatchQueue};
use crate::services::DispatchRules;
use crate::state_machine::CourierState;

use super::shutdown::ShutdownSignal;

/// How a courier execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourierOutcome {
    /// Queue drained or cooperative cancellation
    Terminated,
    /// Stopped on a rules violation or the task died
    Failed,
    /// Did not stop within the shutdown grace period and was aborted
    Abandoned,
}

/// Summary of one courier's shift
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierReport {
    pub courier_id: Uuid,
    pub name: String,
    pub outcome: CourierOutcome,
    /// Delivered order ids in completion order
    pub delivered: Vec<u64>,
    /// Order left in transit because shutdown interrupted its delivery
    pub stranded: Option<u64>,
    /// Whether the courier stopped because of a shutdown request
    pub cancelled: bool,
    pub failure: Option<DispatchError>,
}

impl CourierReport {
    fn empty(courier_id: Uuid, name: String, outcome: CourierOutcome) -> Self {
        Self {
            courier_id,
            name,
            outcome,
            delivered: Vec::new(),
            stranded: None,
            cancelled: false,
            failure: None,
        }
    }

    pub(crate) fn aborted(courier_id: Uuid, name: String, join_error: &JoinError) -> Self {
        let failure = DispatchError::CourierAborted {
            courier: name.clone(),
            reason: join_error.to_string(),
        };
        let mut report = Self::empty(courier_id, name, CourierOutcome::Failed);
        report.failure = Some(failure);
        report
    }

    pub(crate) fn abandoned(courier_id: Uuid, name: String) -> Self {
        let mut report = Self::empty(courier_id, name, CourierOutcome::Abandoned);
        report.cancelled = true;
        report
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == CourierOutcome::Failed
    }
}

/// Handle to a spawned courier, used by the dispatcher to await its report
#[derive(Debug)]
pub struct CourierHandle {
    id: Uuid,
    name: String,
    state: Arc<RwLock<CourierState>>,
    pub(crate) join: JoinHandle<CourierReport>,
}

impl CourierHandle {
    pub(crate) fn new(
        id: Uuid,
        name: String,
        state: Arc<RwLock<CourierState>>,
        join: JoinHandle<CourierReport>,
    ) -> Self {
        Self {
            id,
            name,
            state,
            join,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live lifecycle state of the courier
    pub fn state(&self) -> CourierState {
        *self.state.read()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// One courier worker bound to the shared queue and rules
#[derive(Debug)]
pub struct Courier {
    id: Uuid,
    name: String,
    queue: Arc<DispatchQueue>,
    rules: Arc<DispatchRules>,
    delivery_delay: DelayRange,
    shutdown: ShutdownSignal,
    state: Arc<RwLock<CourierState>>,
}

impl Courier {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<DispatchQueue>,
        rules: Arc<DispatchRules>,
        delivery_delay: DelayRange,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            queue,
            rules,
            delivery_delay,
            shutdown,
            state: Arc::new(RwLock::new(CourierState::Starting)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CourierState {
        *self.state.read()
    }

    /// Spawn the courier loop on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(self) -> CourierHandle {
        let span = info_span!("courier", name = %self.name, courier_id = %self.id);
        let id = self.id;
        let name = self.name.clone();
        let state = self.state.clone();
        let join = tokio::spawn(self.run().instrument(span));
        CourierHandle::new(id, name, state, join)
    }

    /// Run the courier loop to completion
    pub async fn run(self) -> CourierReport {
        self.transition(CourierState::Running);
        log_courier_operation(&self.name, "start_shift", "running", None);

        let mut report =
            CourierReport::empty(self.id, self.name.clone(), CourierOutcome::Terminated);

        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                next = self.queue.dequeue() => next,
            };

            let mut order = match next {
                Dequeued::Order(order) => order,
                Dequeued::EndOfStream => {
                    log_courier_operation(&self.name, "queue_drained", "running", None);
                    break;
                }
            };

            if let Err(err) = self.rules.begin_transit(&mut order) {
                error!(order_id = order.id(), error = %err, "Pickup rejected");
                report.failure = Some(err);
                break;
            }
            log_order_operation(
                "pickup",
                order.id(),
                order.destination(),
                &order.state().to_string(),
                None,
            );

            let delay = self.delivery_delay.sample();
            let details = format!("simulated duration {}ms", delay.as_millis());
            log_order_operation(
                "delivering",
                order.id(),
                order.destination(),
                &order.state().to_string(),
                Some(&details),
            );

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    warn!(
                        order_id = order.id(),
                        state = %order.state(),
                        "Shutdown interrupted delivery; order left in transit"
                    );
                    report.stranded = Some(order.id());
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            if let Err(err) = self.rules.complete_delivery(&mut order) {
                error!(order_id = order.id(), error = %err, "Delivery rejected");
                report.failure = Some(err);
                break;
            }
            log_order_operation(
                "delivered",
                order.id(),
                order.destination(),
                &order.state().to_string(),
                None,
            );
            report.delivered.push(order.id());
        }

        if report.failure.is_some() {
            report.outcome = CourierOutcome::Failed;
            self.transition(CourierState::Failed);
        } else {
            self.transition(CourierState::Terminated);
        }

        info!(
            delivered = report.delivered.len(),
            cancelled = report.cancelled,
            outcome = ?report.outcome,
            "Courier shift ended"
        );
        log_courier_operation(&self.name, "end_shift", &self.state().to_string(), None);
        report
    }

    fn transition(&self, next: CourierState) {
        let mut state = self.state.write();
        let current = *state;
        if !current.can_transition_to(next) {
            warn!(from = %current, to = %next, "Unexpected courier state transition");
        }
        *state = next;
    }
}
