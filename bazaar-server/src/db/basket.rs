//! Basket query layer
//!
//! Builds the denormalized "order in basket" view: a basket order joined
//! with its product snapshot (title, price, city, deal flags, favourites
//! flag, images). A pure read; the projection is recomputed on every call
//! and never written back.

use shared::models::{OrderInBasket, OrderStatus};
use sqlx::PgPool;

const BASKET_SELECT: &str = "
    SELECT o.id, o.product_id, o.item_count AS count, o.status, o.created_at,
           p.title, p.price, p.city, p.is_delivery, p.is_safe_deal,
           EXISTS (
               SELECT 1 FROM favourites f
               WHERE f.user_id = o.owner_id AND f.product_id = p.id
           ) AS in_favourites,
           COALESCE(
               array_agg(i.url ORDER BY i.sort_order) FILTER (WHERE i.url IS NOT NULL),
               ARRAY[]::text[]
           ) AS images
    FROM orders o
    JOIN products p ON p.id = o.product_id
    LEFT JOIN product_images i ON i.product_id = p.id";

/// All basket lines of a user, newest first. Empty basket is an empty vec.
pub async fn basket_for_user(
    pool: &PgPool,
    owner_id: i64,
) -> Result<Vec<OrderInBasket>, sqlx::Error> {
    sqlx::query_as::<_, OrderInBasket>(&format!(
        "{BASKET_SELECT}
         WHERE o.owner_id = $1 AND o.status = $2
         GROUP BY o.id, p.id
         ORDER BY o.created_at DESC"
    ))
    .bind(owner_id)
    .bind(OrderStatus::InBasket)
    .fetch_all(pool)
    .await
}

/// A single basket line, used to echo the created/updated order back.
///
/// Scoped by owner; `None` for a missing or foreign order.
pub async fn basket_line(
    pool: &PgPool,
    order_id: i64,
    owner_id: i64,
) -> Result<Option<OrderInBasket>, sqlx::Error> {
    sqlx::query_as::<_, OrderInBasket>(&format!(
        "{BASKET_SELECT}
         WHERE o.id = $1 AND o.owner_id = $2
         GROUP BY o.id, p.id"
    ))
    .bind(order_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}
