//! Basket orchestrator
//!
//! The externally consumed contract of the order engine: add-to-basket,
//! list-basket, change-count, change-status, buy-whole-basket, delete.
//! Each operation validates its input, opens exactly one transaction,
//! drives the record store, and returns sanitized view models.
//!
//! The status transition guard lives in [`advance_order`]: the row lock
//! taken by the first SELECT serializes concurrent status changes on one
//! order, the pure rule in `shared::models::order` decides whether the
//! transition is an increase, and the one-time stock decrement happens in
//! the same transaction as the first exit from the basket. Dropping the
//! transaction on any error rolls everything back together.

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderInBasket, OrderStatus};
use sqlx::PgPool;

use crate::db;
use crate::error::{ServiceError, ServiceResult};

/// Reject non-positive quantities before any store call executes
fn validate_count(count: i32) -> Result<(), AppError> {
    if count <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidOrderCount,
            format!("count must be positive, got {count}"),
        ));
    }
    Ok(())
}

/// Parse a wire status value into the enum range
fn parse_status(raw: i16) -> Result<OrderStatus, AppError> {
    OrderStatus::try_from(raw).map_err(|e| {
        AppError::with_message(ErrorCode::ValueOutOfRange, e.to_string()).with_detail("status", raw)
    })
}

/// Map a foreign-key violation on insert to the missing-product error
fn map_insert_error(e: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &e
        && matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
    {
        return AppError::new(ErrorCode::ProductNotFound).into();
    }
    e.into()
}

/// Create a basket order and return its denormalized view
pub async fn add_order(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    count: i32,
) -> ServiceResult<OrderInBasket> {
    validate_count(count)?;

    let mut tx = pool.begin().await?;
    let order_id = db::orders::insert(&mut tx, user_id, product_id, count)
        .await
        .map_err(map_insert_error)?;
    tx.commit().await?;

    let line = db::basket::basket_line(pool, order_id, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(line.sanitize())
}

/// All basket lines of a user, sanitized. Empty basket is not an error.
pub async fn get_basket(pool: &PgPool, user_id: i64) -> ServiceResult<Vec<OrderInBasket>> {
    let lines = db::basket::basket_for_user(pool, user_id).await?;
    Ok(lines.into_iter().map(OrderInBasket::sanitize).collect())
}

/// Change the quantity of an order still in the basket
pub async fn update_count(
    pool: &PgPool,
    user_id: i64,
    order_id: i64,
    new_count: i32,
) -> ServiceResult<()> {
    validate_count(new_count)?;

    let mut tx = pool.begin().await?;
    let locked = db::orders::lock_for_status_change(&mut tx, order_id, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if locked.status != OrderStatus::InBasket {
        return Err(AppError::new(ErrorCode::OrderNotInBasket).into());
    }
    db::orders::update_count(&mut tx, order_id, user_id, new_count).await?;
    tx.commit().await?;
    Ok(())
}

/// Advance one order's status through the transition guard
pub async fn update_status(
    pool: &PgPool,
    user_id: i64,
    order_id: i64,
    new_status: i16,
) -> ServiceResult<Order> {
    let target = parse_status(new_status)?;
    advance_order(pool, user_id, order_id, target).await
}

/// Advance every basket order of the user to Created.
///
/// One guarded transaction per order (not atomic across the basket); the
/// walk stops at the first failing order and reports its error. Returns
/// the number of orders advanced.
pub async fn buy_full_basket(pool: &PgPool, user_id: i64) -> ServiceResult<usize> {
    let ids = db::orders::basket_order_ids(pool, user_id).await?;
    let mut bought = 0;
    for order_id in &ids {
        advance_order(pool, user_id, *order_id, OrderStatus::Created).await?;
        bought += 1;
    }
    Ok(bought)
}

/// Hard-delete an order. A missing or foreign id is a silent no-op.
pub async fn delete_order(pool: &PgPool, user_id: i64, order_id: i64) -> ServiceResult<()> {
    let rows = db::orders::delete(pool, order_id, user_id).await?;
    if rows == 0 {
        tracing::debug!(order_id, user_id, "delete matched no order");
    }
    Ok(())
}

/// The status transition guard (one transaction per call).
///
/// 1. Lock the order row and read its current status.
/// 2. Reject anything that is not a strict increase.
/// 3. On the first exit from the basket, consume one unit of stock; a
///    counter already at zero aborts the whole transaction.
/// 4. Apply the new status (stamping `closed_at` for the terminal one).
/// 5. Re-read and return the order as confirmation.
async fn advance_order(
    pool: &PgPool,
    user_id: i64,
    order_id: i64,
    target: OrderStatus,
) -> ServiceResult<Order> {
    let mut tx = pool.begin().await?;

    let locked = db::orders::lock_for_status_change(&mut tx, order_id, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let transition = locked
        .status
        .advance_to(target)
        .map_err(|e| AppError::with_message(ErrorCode::StatusNotIncreasing, e.to_string()))?;

    if transition.consumes_stock
        && !db::orders::decrement_available(&mut tx, locked.product_id).await?
    {
        return Err(AppError::new(ErrorCode::ProductOutOfStock).into());
    }

    db::orders::update_status(&mut tx, order_id, target, transition.closes).await?;

    let order = db::orders::fetch(&mut tx, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    tx.commit().await?;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_count_rejects_zero_and_negative() {
        assert!(validate_count(0).is_err());
        assert!(validate_count(-3).is_err());
        assert!(validate_count(1).is_ok());

        let err = validate_count(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderCount);
    }

    #[test]
    fn test_parse_status_bounds() {
        assert_eq!(parse_status(0).unwrap(), OrderStatus::InBasket);
        assert_eq!(parse_status(4).unwrap(), OrderStatus::Closed);

        let err = parse_status(5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(parse_status(-1).is_err());
    }
}
