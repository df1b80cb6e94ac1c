//! Order record store
//!
//! Atomic SQL operations over the `orders` table. Every mutation here runs
//! against a caller-supplied connection so the service layer controls the
//! transaction boundary. Ownership is enforced in the WHERE clause of each
//! statement that targets a single order, never left to the caller.

use shared::models::{Order, OrderStatus};
use shared::util::now_millis;
use sqlx::{PgConnection, PgPool};

/// Order row locked for a status change
#[derive(Debug, sqlx::FromRow)]
pub struct LockedOrder {
    pub status: OrderStatus,
    pub product_id: i64,
}

/// Insert a fresh basket order and return its id.
///
/// `count` is caller-validated; the product FK is the storage-boundary
/// existence check.
pub async fn insert(
    conn: &mut PgConnection,
    owner_id: i64,
    product_id: i64,
    count: i32,
) -> Result<i64, sqlx::Error> {
    let now = now_millis();
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (owner_id, product_id, item_count, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING id",
    )
    .bind(owner_id)
    .bind(product_id)
    .bind(count)
    .bind(OrderStatus::InBasket)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Read an order's status and product, taking a row lock for the rest of
/// the transaction. This is the first statement of every guarded status
/// change; concurrent changes to the same order serialize here.
///
/// Returns `None` when the order does not exist or belongs to another user.
pub async fn lock_for_status_change(
    conn: &mut PgConnection,
    order_id: i64,
    owner_id: i64,
) -> Result<Option<LockedOrder>, sqlx::Error> {
    sqlx::query_as::<_, LockedOrder>(
        "SELECT status, product_id FROM orders
         WHERE id = $1 AND owner_id = $2
         FOR UPDATE",
    )
    .bind(order_id)
    .bind(owner_id)
    .fetch_optional(conn)
    .await
}

/// Update the quantity of a basket order.
///
/// The WHERE clause also requires `status = 0`: count is mutable only while
/// the order is still in the basket. Returns the number of rows touched;
/// zero means missing, foreign, or already committed.
pub async fn update_count(
    conn: &mut PgConnection,
    order_id: i64,
    owner_id: i64,
    new_count: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET item_count = $1, updated_at = $2
         WHERE id = $3 AND owner_id = $4 AND status = $5",
    )
    .bind(new_count)
    .bind(now_millis())
    .bind(order_id)
    .bind(owner_id)
    .bind(OrderStatus::InBasket)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Apply a validated status transition. `closes` stamps `closed_at` once.
///
/// Correctness depends on the caller having run the transition guard inside
/// the same transaction, after [`lock_for_status_change`].
pub async fn update_status(
    conn: &mut PgConnection,
    order_id: i64,
    new_status: OrderStatus,
    closes: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders
         SET status = $1,
             updated_at = $2,
             closed_at = COALESCE(closed_at, CASE WHEN $3 THEN $2 END)
         WHERE id = $4",
    )
    .bind(new_status)
    .bind(now_millis())
    .bind(closes)
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Conditionally consume one unit of a product's stock.
///
/// Returns `false` when the counter is already at zero; the enclosing
/// transaction must then abort so the status change rolls back with it.
pub async fn decrement_available(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products SET available_count = available_count - 1
         WHERE id = $1 AND available_count > 0",
    )
    .bind(product_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Point read of a full order row (confirmation read after a transition)
pub async fn fetch(conn: &mut PgConnection, order_id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "SELECT id, owner_id, product_id, item_count, status, created_at, updated_at, closed_at
         FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await
}

/// Ids of every basket order of a user, oldest first (buy-full-basket walk)
pub async fn basket_order_ids(pool: &PgPool, owner_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT id FROM orders WHERE owner_id = $1 AND status = $2 ORDER BY created_at",
    )
    .bind(owner_id)
    .bind(OrderStatus::InBasket)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Hard-delete an order, scoped by id and owner.
///
/// Deleting a missing or foreign order affects zero rows; the caller
/// reports that as success (documented no-op).
pub async fn delete(pool: &PgPool, order_id: i64, owner_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND owner_id = $2")
        .bind(order_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
