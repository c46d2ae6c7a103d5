//! # Dispatch Queue
//!
//! Closable FIFO shared by one producer and any number of courier consumers.
//!
//! A single `parking_lot::Mutex` guards both the buffered orders and the `closed`
//! flag. Blocked consumers wait on a `tokio::sync::Notify` that stands in for the
//! "non-empty or closed" condition: every enqueue wakes one waiter, `close` wakes
//! them all. The lock is never held across an `.await`.
//!
//! Closure replaces per-consumer sentinel values, so the number of consumers never
//! has to be known up front.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::error::{DispatchError, Result};
use crate::models::Order;

/// Result of a [`DispatchQueue::dequeue`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued {
    /// The head of the queue, now owned by the caller
    Order(Order),
    /// The queue is closed and drained; no further orders will ever arrive
    EndOfStream,
}

impl Dequeued {
    pub fn into_order(self) -> Option<Order> {
        match self {
            Self::Order(order) => Some(order),
            Self::EndOfStream => None,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    orders: VecDeque<Order>,
    closed: bool,
}

/// Shared staging area for orders waiting to be picked up
#[derive(Debug, Default)]
pub struct DispatchQueue {
    state: Mutex<QueueState>,
    available: Notify,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order to the tail and wake one waiting consumer.
    ///
    /// Fails with [`DispatchError::QueueClosed`] once the queue has been closed;
    /// the buffered contents are left untouched in that case.
    pub fn enqueue(&self, order: Order) -> Result<()> {
        let order_id = order.id();
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(DispatchError::QueueClosed { order_id });
            }
            state.orders.push_back(order);
        }

        self.available.notify_one();
        debug!(order_id = order_id, "Order enqueued");
        Ok(())
    }

    /// Remove and return the head of the queue, suspending while the queue is
    /// empty and still open.
    ///
    /// Returns [`Dequeued::EndOfStream`] once the queue is both closed and empty,
    /// for every caller, including ones that arrive after closure. The future is
    /// cancellation safe: an order is only removed in the same poll that returns it.
    pub async fn dequeue(&self) -> Dequeued {
        loop {
            // Register interest before inspecting the state so an enqueue or close
            // landing between the check and the await still wakes us.
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(order) = state.orders.pop_front() {
                    return Dequeued::Order(order);
                }
                if state.closed {
                    return Dequeued::EndOfStream;
                }
            }

            notified.await;
        }
    }

    /// Non-blocking variant of [`dequeue`](Self::dequeue). `None` means the queue
    /// is empty but still open.
    pub fn try_dequeue(&self) -> Option<Dequeued> {
        let mut state = self.state.lock();
        match state.orders.pop_front() {
            Some(order) => Some(Dequeued::Order(order)),
            None if state.closed => Some(Dequeued::EndOfStream),
            None => None,
        }
    }

    /// Stop accepting orders and wake every blocked consumer.
    ///
    /// Idempotent; returns `true` only for the call that actually closed the queue.
    pub fn close(&self) -> bool {
        let newly_closed = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.closed, true)
        };

        if newly_closed {
            self.available.notify_waiters();
            info!(buffered = self.size(), "Dispatch queue closed");
        }
        newly_closed
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Snapshot of the number of buffered orders; advisory under concurrency
    pub fn size(&self) -> usize {
        self.state.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    fn order(id: u64) -> Order {
        Order::new(id, format!("Destination {id}")).unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order_single_consumer() {
        let queue = DispatchQueue::new();
        for id in 1..=5 {
            queue.enqueue(order(id)).unwrap();
        }
        assert_eq!(queue.size(), 5);
        queue.close();

        let mut seen = Vec::new();
        while let Dequeued::Order(order) = queue.dequeue().await {
            seen.push(order.id());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_enqueue_after_close_is_rejected() {
        let queue = DispatchQueue::new();
        queue.enqueue(order(1)).unwrap();
        assert!(queue.close());

        let err = queue.enqueue(order(2)).unwrap_err();
        assert_eq!(err, DispatchError::QueueClosed { order_id: 2 });
        assert_eq!(queue.size(), 1);

        // Buffered orders still drain after closure
        assert_eq!(queue.dequeue().await.into_order().unwrap().id(), 1);
        assert!(queue.dequeue().await.is_end_of_stream());
    }

    #[test]
    fn test_close_is_idempotent() {
        let queue = DispatchQueue::new();
        assert!(!queue.is_closed());
        assert!(queue.close());
        assert!(!queue.close());
        assert!(queue.is_closed());
    }

    #[test]
    fn test_dequeue_waits_until_enqueue() {
        let queue = DispatchQueue::new();
        let mut pending = task::spawn(queue.dequeue());
        assert_pending!(pending.poll());

        queue.enqueue(order(42)).unwrap();
        assert!(pending.is_woken());
        let next = assert_ready!(pending.poll());
        assert_eq!(next.into_order().unwrap().id(), 42);
    }

    #[test]
    fn test_close_wakes_every_waiter() {
        let queue = DispatchQueue::new();
        let mut first = task::spawn(queue.dequeue());
        let mut second = task::spawn(queue.dequeue());
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        queue.close();
        assert!(first.is_woken());
        assert!(second.is_woken());
        assert!(assert_ready!(first.poll()).is_end_of_stream());
        assert!(assert_ready!(second.poll()).is_end_of_stream());

        // Late arrivals observe the end of stream immediately
        let mut late = task::spawn(queue.dequeue());
        assert!(assert_ready!(late.poll()).is_end_of_stream());
    }

    #[test]
    fn test_try_dequeue() {
        let queue = DispatchQueue::new();
        assert!(queue.try_dequeue().is_none());
        queue.enqueue(order(1)).unwrap();
        assert_eq!(
            queue.try_dequeue().and_then(Dequeued::into_order).map(|o| o.id()),
            Some(1)
        );
        queue.close();
        assert_eq!(queue.try_dequeue(), Some(Dequeued::EndOfStream));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumers_never_share_an_order() {
        let queue = Arc::new(DispatchQueue::new());
        let mut consumers = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            consumers.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                while let Dequeued::Order(order) = queue.dequeue().await {
                    ids.push(order.id());
                }
                ids
            }));
        }

        for id in 1..=200 {
            queue.enqueue(order(id)).unwrap();
            if id % 50 == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
        queue.close();

        let mut all = Vec::new();
        for consumer in consumers {
            let ids = consumer.await.unwrap();
            // Each consumer sees orders in enqueue order
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            all.extend(ids);
        }
        all.sort_unstable();
        assert_eq!(all, (1..=200).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_dropped_waiter_passes_wakeup_on() {
        let queue = Arc::new(DispatchQueue::new());

        let cancelled = {
            let queue = queue.clone();
            tokio::spawn(async move {
                tokio::time::timeout(Duration::from_millis(10), queue.dequeue()).await
            })
        };
        let survivor = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };

        assert!(cancelled.await.unwrap().is_err());
        queue.enqueue(order(5)).unwrap();
        let received = tokio::time::timeout(Duration::from_secs(1), survivor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.into_order().unwrap().id(), 5);
    }
}
