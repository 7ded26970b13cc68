use axum::{
    routing::get,
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::customer::{create_customer, get_customer, list_customers, update_customer, delete_customer};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route_layer(middleware::from_fn(require_auth))
}
