//! Producer/consumer behaviour of the dispatch queue across tasks.

use std::sync::Arc;
use std::time::Duration;

use dispatch_center::{Dequeued, DispatchError, DispatchQueue, Order};

fn order(id: u64) -> Order {
    Order::new(id, "Santiago Centro").unwrap()
}

#[tokio::test]
async fn test_consumers_started_before_producer_receive_everything() {
    let queue = Arc::new(DispatchQueue::new());

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            tokio::spawn(async move {
                let mut ids = Vec::new();
                while let Dequeued::Order(order) = queue.dequeue().await {
                    ids.push(order.id());
                }
                ids
            })
        })
        .collect();

    for id in 1..=30 {
        queue.enqueue(order(id)).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    queue.close();

    let mut received = Vec::new();
    for consumer in consumers {
        received.extend(consumer.await.unwrap());
    }
    received.sort_unstable();
    assert_eq!(received, (1..=30).collect::<Vec<_>>());
    assert_eq!(queue.size(), 0);
}

#[tokio::test]
async fn test_end_of_stream_for_every_caller_after_close() {
    let queue = DispatchQueue::new();
    queue.close();

    for _ in 0..5 {
        assert_eq!(queue.dequeue().await, Dequeued::EndOfStream);
    }
}

#[tokio::test]
async fn test_enqueue_after_close_leaves_contents_unchanged() {
    let queue = DispatchQueue::new();
    queue.enqueue(order(1)).unwrap();
    queue.enqueue(order(2)).unwrap();
    queue.close();

    assert_eq!(
        queue.enqueue(order(3)),
        Err(DispatchError::QueueClosed { order_id: 3 })
    );
    assert_eq!(queue.size(), 2);

    let drained: Vec<u64> =
        std::iter::from_fn(|| queue.try_dequeue().and_then(Dequeued::into_order))
            .map(|o| o.id())
            .collect();
    assert_eq!(drained, vec![1, 2]);
}

#[tokio::test]
async fn test_blocked_consumers_released_by_close() {
    let queue = Arc::new(DispatchQueue::new());
    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    queue.close();

    for waiter in waiters {
        let result = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released by close")
            .unwrap();
        assert!(result.is_end_of_stream());
    }
}
