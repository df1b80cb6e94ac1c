//! Shared types for the bazaar marketplace backend
//!
//! Common types used across crates: error codes and the application error
//! type, the wire response envelope, domain models for the order/basket
//! lifecycle, and small utilities.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use response::Envelope;
