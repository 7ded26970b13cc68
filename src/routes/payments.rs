use axum::{
    routing::{get, delete},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::payment::{add_payment, list_payments, delete_payment};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}/payments", get(list_payments).post(add_payment))
        .route("/payments/{id}", delete(delete_payment))
        .route_layer(middleware::from_fn(require_auth))
}
