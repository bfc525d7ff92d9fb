//! Core logic for the PizzaDronz delivery drone.
//!
//! This crate owns the geometry primitives, the A* route finder and the
//! order validation rules. It performs no I/O; the REST client and the
//! output writers live in their own crates.

pub mod error;
pub mod geometry;
pub mod models;
pub mod pathfinder;
pub mod validation;

pub use error::CoreError;
pub use geometry::{
    distance, is_close, is_in_region, next_position, APPLETON_TOWER, DRONE_IS_CLOSE_DISTANCE,
    DRONE_MOVE_DISTANCE,
};
pub use models::{
    CreditCardInformation, LngLat, NamedRegion, Order, OrderStatus, OrderValidationCode, Pizza,
    Restaurant, MAX_PIZZAS_PER_ORDER, ORDER_CHARGE_IN_PENCE,
};
pub use pathfinder::{Bearing, Direction, PathFinder, RouteResult};
pub use validation::validate_order;
