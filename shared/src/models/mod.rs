//! Domain models

pub mod basket;
pub mod order;

pub use basket::OrderInBasket;
pub use order::{InvalidOrderStatus, Order, OrderStatus, Transition, TransitionError};
