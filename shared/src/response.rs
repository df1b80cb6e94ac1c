//! API response envelope
//!
//! Every endpoint answers with the same wire shape:
//!
//! ```json
//! {
//!     "status": 200,
//!     "body": { ... }
//! }
//! ```
//!
//! On failure `body` carries an error object instead of the payload:
//!
//! ```json
//! {
//!     "status": 400,
//!     "body": { "error": "order status must only increase" }
//! }
//! ```

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Unified response envelope
///
/// `status` mirrors the HTTP status code so clients behind proxies that
/// rewrite statuses can still branch on the envelope alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Numeric status code (HTTP status class)
    pub status: u16,
    /// Payload on success, `{"error": ...}` on failure
    pub body: Body<T>,
}

/// Envelope body: either the payload or an error object
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body<T> {
    /// Error object (checked first during deserialization)
    Error {
        /// Human-readable error message
        error: String,
    },
    /// Success payload
    Payload(T),
}

/// Payload for endpoints that only confirm an action
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    /// Confirmation text
    pub message: String,
}

impl<T> Envelope<T> {
    /// Create a success envelope with a payload
    pub fn ok(payload: T) -> Self {
        Self {
            status: http::StatusCode::OK.as_u16(),
            body: Body::Payload(payload),
        }
    }

    /// Create an error envelope from an [`AppError`]
    pub fn from_error(err: &AppError) -> Self {
        Self {
            status: err.http_status().as_u16(),
            body: Body::Error {
                error: err.message.clone(),
            },
        }
    }
}

impl Envelope<Message> {
    /// Create a success envelope carrying only a confirmation message
    pub fn message(text: impl Into<String>) -> Self {
        Self::ok(Message {
            message: text.into(),
        })
    }
}

impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_ok_envelope_shape() {
        let env = Envelope::ok(serde_json::json!({"id": 7}));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["body"]["id"], 7);
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::new(ErrorCode::StatusNotIncreasing);
        let env = Envelope::<()>::from_error(&err);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["body"]["error"], "Order status must only increase");
    }

    #[test]
    fn test_internal_error_envelope() {
        let err = AppError::new(ErrorCode::InternalError);
        let env = Envelope::<()>::from_error(&err);
        assert_eq!(env.status, 500);
    }

    #[test]
    fn test_message_envelope() {
        let env = Envelope::message("order deleted");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["body"]["message"], "order deleted");
    }
}
