//! Database access layer

pub mod basket;
pub mod orders;
