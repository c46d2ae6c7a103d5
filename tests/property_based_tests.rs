mod common;

use common::builders::{sample_orders, DispatchConfigBuilder};
use common::strategies::*;
use dispatch_center::orchestration::Dispatcher;
use dispatch_center::{DispatchRules, Order, OrderState};
use proptest::prelude::*;

const LIFECYCLE: [OrderState; 3] = [
    OrderState::Pending,
    OrderState::InTransit,
    OrderState::Delivered,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: an order's observed states are always a prefix of the lifecycle,
    /// whatever sequence of operations is attempted against it
    #[test]
    fn observed_states_are_a_lifecycle_prefix(
        ops in rule_ops_strategy(),
        destination in destination_strategy(),
    ) {
        let rules = DispatchRules::new();
        let mut order = Order::new(1, destination).unwrap();

        for op in ops {
            let _ = match op {
                RuleOp::BeginTransit => rules.begin_transit(&mut order),
                RuleOp::CompleteDelivery => rules.complete_delivery(&mut order),
            };
        }

        let observed = order.observed_states();
        prop_assert!(observed.len() <= LIFECYCLE.len());
        prop_assert_eq!(&observed[..], &LIFECYCLE[..observed.len()]);
        prop_assert_eq!(
            rules.total_delivered(),
            usize::from(order.state() == OrderState::Delivered)
        );
    }

    /// Property: every order is delivered exactly once, for any order count and
    /// any number of couriers
    #[test]
    fn every_order_delivered_exactly_once((order_count, couriers) in workload_strategy()) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let config = DispatchConfigBuilder::new()
            .with_couriers(couriers)
            .with_delivery_delay(dispatch_center::DelayRange::new(0, 1))
            .with_arrival_delay(dispatch_center::DelayRange::fixed(0))
            .build();

        let report = runtime.block_on(async {
            let dispatcher = Dispatcher::new(config).unwrap();
            dispatcher.run(sample_orders(order_count)).await.unwrap()
        });

        let mut delivered: Vec<u64> = report
            .couriers
            .iter()
            .flat_map(|c| c.delivered.iter().copied())
            .collect();
        delivered.sort_unstable();

        prop_assert_eq!(delivered, (1..=order_count).collect::<Vec<_>>());
        prop_assert_eq!(report.total_delivered as u64, order_count);
        prop_assert_eq!(report.residual_queue_size, 0);
        prop_assert!(report.is_consistent());
    }
}
