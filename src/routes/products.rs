use axum::{
    routing::get,
    Router,
};
use crate::handlers::product::{
    get_products, get_product, create_product, update_product, delete_product
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(get_products).post(create_product))
        // Integer keys are ids, anything else is a product name.
        .route("/products/{key}", get(get_product).put(update_product).delete(delete_product))
}
