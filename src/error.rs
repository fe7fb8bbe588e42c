// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::repositories::RepoError;

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "The page is missing. Please check your route!";
pub const INTERNAL_ERROR_MESSAGE: &str = "There was an error processing your request!";
pub const INSUFFICIENT_STOCK_MESSAGE: &str = "Sold quantity exceeds what is in stock!";

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    ValidationError(String),
    NotFound(String),
    /// Delete blocked by dependent sale records.
    Conflict(String),
    Duplicate(String),
    InsufficientStock,
    RouteNotFound,
    Internal(String),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        AppError::Duplicate(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) | AppError::InsufficientStock => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::FORBIDDEN,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Unauthorized(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Duplicate(msg) => msg.as_str(),
            AppError::InsufficientStock => INSUFFICIENT_STOCK_MESSAGE,
            AppError::RouteNotFound => ROUTE_NOT_FOUND_MESSAGE,
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                INTERNAL_ERROR_MESSAGE
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::ProductNotFound => AppError::not_found("Product was not found!"),
            RepoError::InsufficientStock => AppError::InsufficientStock,
            RepoError::HasSales => {
                AppError::conflict("Product cannot be deleted. A sale(s) for the product exists")
            }
            RepoError::DuplicateName => AppError::duplicate("Product name already exists"),
            other => AppError::internal(other.to_string()),
        }
    }
}
