use axum::{
    routing::get,
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::shop::{create_shop, get_shop, list_shops, update_shop, delete_shop};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/{id}", get(get_shop))
        .route("/shops/{id}", axum::routing::put(update_shop))
        .route("/shops/{id}", axum::routing::delete(delete_shop))
        .route_layer(middleware::from_fn(require_auth))
}
