//! Service layer

pub mod basket;
