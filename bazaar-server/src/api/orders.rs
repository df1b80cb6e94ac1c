//! Order/basket endpoints
//!
//! Thin delivery layer: decode the request, pull the authenticated user id
//! from the session extension, delegate to the basket service, wrap the
//! result in the response envelope.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::OrderInBasket;
use shared::response::{Envelope, Message};

use crate::auth::UserIdentity;
use crate::error::ServiceError;
use crate::services::basket;
use crate::state::AppState;

type ApiResult<T> = Result<Envelope<T>, ServiceError>;

#[derive(Debug, Deserialize)]
pub struct AddOrderRequest {
    #[serde(rename = "productID", alias = "productId")]
    pub product_id: i64,
    pub count: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCountRequest {
    pub id: i64,
    pub count: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: i64,
    pub status: i16,
}

/// POST /order/add
pub async fn add_order(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<AddOrderRequest>,
) -> ApiResult<OrderInBasket> {
    let line = basket::add_order(&state.pool, identity.user_id, req.product_id, req.count).await?;
    Ok(Envelope::ok(line))
}

/// GET /order/get_basket
pub async fn get_basket(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<OrderInBasket>> {
    let lines = basket::get_basket(&state.pool, identity.user_id).await?;
    Ok(Envelope::ok(lines))
}

/// PATCH /order/update_count
pub async fn update_count(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<UpdateCountRequest>,
) -> ApiResult<Message> {
    basket::update_count(&state.pool, identity.user_id, req.id, req.count).await?;
    Ok(Envelope::message("order count updated"))
}

/// PATCH /order/update_status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Message> {
    basket::update_status(&state.pool, identity.user_id, req.id, req.status).await?;
    Ok(Envelope::message("order status updated"))
}

/// PATCH /order/buy_full_basket
pub async fn buy_full_basket(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Message> {
    let bought = basket::buy_full_basket(&state.pool, identity.user_id).await?;
    Ok(Envelope::message(format!("{bought} orders purchased")))
}

/// DELETE /order/delete/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(order_id): Path<i64>,
) -> ApiResult<Message> {
    basket::delete_order(&state.pool, identity.user_id, order_id).await?;
    Ok(Envelope::message("order deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_order_request_wire_names() {
        let req: AddOrderRequest =
            serde_json::from_str(r#"{"productID": 42, "count": 2}"#).unwrap();
        assert_eq!(req.product_id, 42);
        assert_eq!(req.count, 2);

        // camelCase alias also accepted
        let req: AddOrderRequest =
            serde_json::from_str(r#"{"productId": 7, "count": 1}"#).unwrap();
        assert_eq!(req.product_id, 7);
    }

    #[test]
    fn test_update_status_request() {
        let req: UpdateStatusRequest = serde_json::from_str(r#"{"id": 3, "status": 1}"#).unwrap();
        assert_eq!(req.id, 3);
        assert_eq!(req.status, 1);
    }
}
