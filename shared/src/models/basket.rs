//! Basket projection model

use crate::models::order::OrderStatus;
use crate::util::escape_html;
use serde::{Deserialize, Serialize};

/// Read-only projection of a basket order joined with its product snapshot
///
/// Recomputed on every read and never written back. Text fields are
/// user-supplied and must be sanitized before leaving the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderInBasket {
    /// Order id
    pub id: i64,
    pub product_id: i64,
    /// Ordered quantity
    pub count: i32,
    /// Always [`OrderStatus::InBasket`] for rows served from the basket view
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
    /// Product title (sanitized on return)
    pub title: String,
    /// Price in minor currency units
    pub price: i64,
    /// Product city (sanitized on return)
    pub city: String,
    /// Seller offers delivery
    pub is_delivery: bool,
    /// Safe-deal payment available
    pub is_safe_deal: bool,
    /// Product is in the requesting user's favourites
    pub in_favourites: bool,
    /// Product image URLs, display order
    pub images: Vec<String>,
}

impl OrderInBasket {
    /// Escape user-supplied text fields for safe rendering
    pub fn sanitize(mut self) -> Self {
        self.title = escape_html(&self.title);
        self.city = escape_html(&self.city);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> OrderInBasket {
        OrderInBasket {
            id: 1,
            product_id: 42,
            count: 2,
            status: OrderStatus::InBasket,
            created_at: 0,
            title: "<b>bike</b>".into(),
            price: 15_000,
            city: "Moscow".into(),
            is_delivery: true,
            is_safe_deal: false,
            in_favourites: false,
            images: vec!["/img/1.jpg".into()],
        }
    }

    #[test]
    fn test_sanitize_escapes_title() {
        let sanitized = line().sanitize();
        assert_eq!(sanitized.title, "&lt;b&gt;bike&lt;/b&gt;");
        assert_eq!(sanitized.city, "Moscow");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(line()).unwrap();
        assert!(json.get("productId").is_some());
        assert!(json.get("isSafeDeal").is_some());
        assert!(json.get("inFavourites").is_some());
        assert_eq!(json["status"], 0);
    }
}
