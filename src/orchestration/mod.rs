//! # Orchestration Engine
//!
//! Concurrency core of the dispatch center.
//!
//! ## Core Components
//!
//! - **Dispatcher**: starts the courier pool, feeds orders, closes the queue and
//!   awaits every courier
//! - **Courier**: spawned worker loop draining the shared queue
//! - **ShutdownSignal**: cooperative cancellation shared by all of the above
//!
//! ## Data Flow
//!
//! ```text
//! Dispatcher --enqueue--> DispatchQueue --dequeue--> Courier
//!                                                      |
//!                        DispatchRules <--transitions--+
//! ```

pub mod courier;
pub mod dispatcher;
pub mod roster;
pub mod shutdown;

pub use courier::{Courier, CourierHandle, CourierOutcome, CourierReport};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use roster::{courier_names, generate_orders};
pub use shutdown::ShutdownSignal;
