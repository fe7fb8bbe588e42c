pub mod products;
pub mod sales;

use axum::{middleware, Router};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Every API route requires a bearer token.
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(sales::routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
