#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! # Dispatch Center
//!
//! In-memory simulation of a dispatch center: orders arrive over time into a shared
//! staging queue, a fixed pool of courier workers drains it concurrently, and every
//! order moves through a strict `pending -> in_transit -> delivered` lifecycle.
//!
//! ## Architecture
//!
//! - A closable FIFO ([`DispatchQueue`]) shared by one producer and N consumers.
//!   Closing it is the end-of-stream signal; no sentinel values are used.
//! - [`DispatchRules`] validate each transition and keep a ledger of delivered ids
//!   for duplicate detection.
//! - [`Courier`] tasks pull, transition and deliver until the queue is closed and
//!   empty, or until shutdown is requested.
//! - The [`Dispatcher`] starts the pool, feeds orders, closes the queue and waits
//!   for every courier to finish.
//!
//! ## Module Organization
//!
//! - [`models`] - Order entity and its transition history
//! - [`state_machine`] - Order and courier lifecycle states
//! - [`messaging`] - The dispatch queue
//! - [`services`] - Dispatch rules and the delivery ledger
//! - [`orchestration`] - Couriers, dispatcher and shutdown signal
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dispatch_center::config::DispatchConfig;
//! use dispatch_center::orchestration::Dispatcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::new(DispatchConfig::default())?;
//! let report = dispatcher.run_generated().await?;
//! assert!(report.is_consistent());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod services;
pub mod state_machine;

pub use config::{ConfigManager, DelayRange, DispatchConfig};
pub use error::{DispatchError, Result};
pub use messaging::{Dequeued, DispatchQueue};
pub use models::{Order, StateTransition};
pub use orchestration::{
    Courier, CourierHandle, CourierOutcome, CourierReport, DispatchReport, Dispatcher,
    ShutdownSignal,
};
pub use services::DispatchRules;
pub use state_machine::{CourierState, OrderState};
