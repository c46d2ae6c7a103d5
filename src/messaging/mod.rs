//! # Messaging
//!
//! In-process hand-off of orders between the dispatcher and its couriers.

pub mod dispatch_queue;

pub use dispatch_queue::{DispatchQueue, Dequeued};
