//! Order model and status lifecycle
//!
//! An order is a persistent intent to purchase a quantity of one product.
//! It is born in the basket (status 0) and only ever moves forward through
//! the status enumeration until it is closed. The transition rule lives
//! here as pure code so the guard inside the service transaction and the
//! tests share one definition.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order lifecycle status
///
/// The numeric values are stored in the database and exposed on the wire;
/// they form a strict order and a stored status never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum OrderStatus {
    /// In the owner's basket; count still mutable, stock untouched
    InBasket = 0,
    /// Committed purchase step; stock consumed on entry from the basket
    Created = 1,
    /// Handed to delivery
    Delivery = 2,
    /// Received by the buyer
    Received = 3,
    /// Terminal state; sets `closed_at`
    Closed = 4,
}

/// Error returned when converting an out-of-range value into [`OrderStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub i16);

impl OrderStatus {
    /// Get the numeric status value
    #[inline]
    pub const fn as_i16(&self) -> i16 {
        *self as i16
    }

    /// Whether this is the terminal status
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Closed)
    }

    /// Validate a transition from `self` to `next`.
    ///
    /// The single invariant of the order lifecycle: a status update must
    /// strictly increase the stored status. Equality is not an increase.
    /// The returned [`Transition`] reports the side effects the caller must
    /// apply in the same transaction: the one-time stock decrement on the
    /// first exit from the basket, and `closed_at` when the destination is
    /// terminal.
    pub fn advance_to(self, next: OrderStatus) -> Result<Transition, TransitionError> {
        if next <= self {
            return Err(TransitionError::NotIncreasing {
                current: self,
                requested: next,
            });
        }
        Ok(Transition {
            consumes_stock: self == OrderStatus::InBasket,
            closes: next.is_terminal(),
        })
    }
}

/// Side effects of a validated status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The order is leaving the basket: decrement the product's stock once
    pub consumes_stock: bool,
    /// The destination is terminal: stamp `closed_at`
    pub closes: bool,
}

/// Rejected status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The requested status does not strictly increase the current one
    #[error("order status must only increase (current {current}, requested {requested})")]
    NotIncreasing {
        current: OrderStatus,
        requested: OrderStatus,
    },
}

impl From<OrderStatus> for i16 {
    fn from(status: OrderStatus) -> Self {
        status.as_i16()
    }
}

impl TryFrom<i16> for OrderStatus {
    type Error = InvalidOrderStatus;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::InBasket),
            1 => Ok(Self::Created),
            2 => Ok(Self::Delivery),
            3 => Ok(Self::Received),
            4 => Ok(Self::Closed),
            _ => Err(InvalidOrderStatus(value)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i16())
    }
}

/// Order entity as stored in the `orders` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub owner_id: i64,
    pub product_id: i64,
    /// Positive quantity; mutable only while status = InBasket
    pub item_count: i32,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
    /// Unix millis, set once status reaches the terminal value
    pub closed_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert_eq!(OrderStatus::InBasket.as_i16(), 0);
        assert_eq!(OrderStatus::Created.as_i16(), 1);
        assert_eq!(OrderStatus::Delivery.as_i16(), 2);
        assert_eq!(OrderStatus::Received.as_i16(), 3);
        assert_eq!(OrderStatus::Closed.as_i16(), 4);
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(OrderStatus::try_from(4), Ok(OrderStatus::Closed));
        assert_eq!(OrderStatus::try_from(5), Err(InvalidOrderStatus(5)));
        assert_eq!(OrderStatus::try_from(-1), Err(InvalidOrderStatus(-1)));
    }

    #[test]
    fn test_first_exit_consumes_stock() {
        let t = OrderStatus::InBasket.advance_to(OrderStatus::Created).unwrap();
        assert!(t.consumes_stock);
        assert!(!t.closes);
    }

    #[test]
    fn test_direct_jump_to_closed_consumes_stock_once() {
        // A basket order may go straight to the terminal status; the stock
        // effect still fires because this is the exit from the basket.
        let t = OrderStatus::InBasket.advance_to(OrderStatus::Closed).unwrap();
        assert!(t.consumes_stock);
        assert!(t.closes);
    }

    #[test]
    fn test_later_increase_never_touches_stock() {
        let t = OrderStatus::Created.advance_to(OrderStatus::Delivery).unwrap();
        assert!(!t.consumes_stock);

        let t = OrderStatus::Received.advance_to(OrderStatus::Closed).unwrap();
        assert!(!t.consumes_stock);
        assert!(t.closes);
    }

    #[test]
    fn test_equal_status_rejected() {
        // Equality is not an increase
        let err = OrderStatus::Created
            .advance_to(OrderStatus::Created)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotIncreasing {
                current: OrderStatus::Created,
                requested: OrderStatus::Created,
            }
        );
    }

    #[test]
    fn test_decrease_rejected() {
        assert!(OrderStatus::Created.advance_to(OrderStatus::InBasket).is_err());
        assert!(OrderStatus::Closed.advance_to(OrderStatus::Received).is_err());
    }

    #[test]
    fn test_status_is_monotonic_over_all_pairs() {
        let all = [
            OrderStatus::InBasket,
            OrderStatus::Created,
            OrderStatus::Delivery,
            OrderStatus::Received,
            OrderStatus::Closed,
        ];
        for cur in all {
            for next in all {
                let result = cur.advance_to(next);
                assert_eq!(result.is_ok(), next > cur, "{cur} -> {next}");
            }
        }
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&OrderStatus::Delivery).unwrap();
        assert_eq!(json, "2");
        let back: OrderStatus = serde_json::from_str("2").unwrap();
        assert_eq!(back, OrderStatus::Delivery);
        assert!(serde_json::from_str::<OrderStatus>("9").is_err());
    }
}
