//! API routes for bazaar-server

pub mod health;
pub mod orders;

use crate::auth::session_auth_middleware;
use crate::state::AppState;
use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Order/basket API (session authenticated)
    let order = Router::new()
        .route("/order/add", post(orders::add_order))
        .route("/order/get_basket", get(orders::get_basket))
        .route("/order/update_count", patch(orders::update_count))
        .route("/order/update_status", patch(orders::update_status))
        .route("/order/buy_full_basket", patch(orders::buy_full_basket))
        .route("/order/delete/{id}", delete(orders::delete_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(order)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
