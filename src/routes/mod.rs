pub mod shops;
pub mod customers;
pub mod product_types;
pub mod orders;
pub mod payments;
pub mod stats;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(shops::routes())
        .merge(customers::routes())
        .merge(product_types::routes())
        .merge(orders::routes())
        .merge(payments::routes())
        .merge(stats::routes())
        .merge(users::routes())
}
