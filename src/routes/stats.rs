use axum::{routing::get, Router, middleware};
use crate::state::AppState;
use crate::handlers::stats::get_stats;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route_layer(middleware::from_fn(require_auth))
}
