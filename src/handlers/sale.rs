use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::{info, instrument};
use crate::auth::role::Action;
use crate::dtos::sale::{CreateSaleRequest, SaleResponse, MISSING_PARAMETER_MESSAGE};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

#[instrument(skip(state, auth, payload), fields(user_id = auth.user_id))]
pub async fn create_sale(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SaleResponse>), AppError> {
    auth.require(Action::RecordSale, "You must be an attendant to sale a product")?;

    let Json(req) = payload.map_err(|_| AppError::validation(MISSING_PARAMETER_MESSAGE))?;
    let order = req.validate()?;

    let sale = state
        .sales
        .record(order.product_id, auth.user_id, order.quantity)
        .await?;
    info!(sale_id = sale.id, product_id = sale.product_id, quantity = sale.quantity, "Sale recorded");

    Ok((StatusCode::CREATED, Json(SaleResponse::from(sale))))
}

/// Admins see every sale; everyone else only their own.
#[instrument(skip(state, auth), fields(user_id = auth.user_id))]
pub async fn list_sales(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<SaleResponse>>, AppError> {
    let sales = if auth.role.permits(Action::ViewAllSales) {
        let all = state.sales.list().await?;
        if all.is_empty() {
            return Err(AppError::not_found("Sales not found!"));
        }
        all
    } else {
        state.sales.list_by_user(auth.user_id).await?
    };

    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SaleResponse>, AppError> {
    // Only numeric ids name a sale; anything else is an unknown route.
    let id: i64 = key.parse().map_err(|_| AppError::RouteNotFound)?;
    let sale = state
        .sales
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Sales record not found!"))?;

    Ok(Json(SaleResponse::from(sale)))
}
