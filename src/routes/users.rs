use axum::{Router, routing::{post, get}, middleware};
use crate::state::AppState;
use crate::handlers::user::{register_user, login_user, get_me};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    let open = Router::new()
        .route("/auth/login", post(login_user));

    // Registration is admin-only; the first admin is seeded out of band
    let protected = Router::new()
        .route("/auth/register", post(register_user))
        .route("/auth/me", get(get_me))
        .layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
