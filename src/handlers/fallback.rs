use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Used by `CatchPanicLayer`; the panic payload is logged, never returned.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(format!("handler panicked: {detail}")).into_response()
}
