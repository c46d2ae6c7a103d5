//! # Dispatch Domain Models
//!
//! In-memory domain entities handled by the dispatch center.

pub mod order;

pub use order::{Order, StateTransition};
