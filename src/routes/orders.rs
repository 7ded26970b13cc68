use axum::{
    routing::{get, post},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::order::{create_order, get_order, list_orders, update_order, delete_order, recalculate_order};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/orders/{id}/recalculate", post(recalculate_order))
        .route_layer(middleware::from_fn(require_auth))
}
