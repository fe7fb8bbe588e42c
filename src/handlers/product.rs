// src/handlers/product.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use crate::auth::role::Action;
use crate::dtos::product::{ProductRequest, ProductResponse};
use crate::dtos::MessageResponse;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::product::NewProduct;
use crate::state::AppState;
use tracing::{info, instrument};

fn product_payload(payload: Result<Json<ProductRequest>, JsonRejection>) -> Result<NewProduct, AppError> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Unreadable product payload");
        AppError::validation("Request body must be a JSON object with valid product fields")
    })?;
    req.validate()
}

/// PUT and DELETE only take numeric ids; anything else is an unknown route.
fn product_id(key: &str) -> Result<i64, AppError> {
    key.parse().map_err(|_| AppError::RouteNotFound)
}

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.products.list().await?;
    if products.is_empty() {
        return Err(AppError::not_found("Products not found!"));
    }

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// GET /products/:key - Get single product by id, or by name when the key is not an integer
#[instrument(skip(state))]
pub async fn get_product(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = match key.parse::<i64>() {
        Ok(id) => state.products.find_by_id(id).await?,
        Err(_) => state.products.find_by_name(&key).await?,
    }
    .ok_or_else(|| AppError::not_found("Product not found!"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, auth, payload), fields(user_id = auth.user_id))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    auth.require(Action::ManageProducts, "You must be an admin to add a product")?;
    let new_product = product_payload(payload)?;

    let product = state.products.create(new_product).await?;
    info!(product_id = product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/:id - Update product
#[instrument(skip(state, auth, payload), fields(user_id = auth.user_id))]
pub async fn update_product(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = product_id(&key)?;
    auth.require(Action::ManageProducts, "You must be an admin to perform this action")?;
    let changes = product_payload(payload)?;

    let product = state
        .products
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found!"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/:id - Delete product
#[instrument(skip(state, auth), fields(user_id = auth.user_id))]
pub async fn delete_product(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = product_id(&key)?;
    auth.require(Action::ManageProducts, "You must be an admin to delete a product")?;

    state.products.delete(id).await?;
    info!(product_id = id, "Product deleted");

    Ok(Json(MessageResponse { message: "Product deleted successfully!" }))
}
