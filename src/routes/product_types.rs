use axum::{
    routing::get,
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::product_type::{
    create_product_type, get_product_type, list_product_types, update_product_type, delete_product_type,
};
use crate::handlers::product_size::{
    create_product_size, list_product_sizes, update_product_size, delete_product_size,
};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/product-types", get(list_product_types).post(create_product_type))
        .route(
            "/product-types/{id}",
            get(get_product_type).put(update_product_type).delete(delete_product_type),
        )
        // Sizes belong to exactly one type
        .route(
            "/product-types/{id}/sizes",
            get(list_product_sizes).post(create_product_size),
        )
        .route(
            "/product-sizes/{id}",
            axum::routing::put(update_product_size).delete(delete_product_size),
        )
        .route_layer(middleware::from_fn(require_auth))
}
