// State machine module for dispatch lifecycles
//
// Orders advance strictly Pending -> InTransit -> Delivered; couriers move
// Starting -> Running -> Terminated | Failed.

pub mod states;

pub use states::{CourierState, OrderState};
