// src/lib.rs
pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

use axum::{routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::fallback::{handle_panic, route_not_found};
use crate::state::AppState;

pub const API_BASE_PATH: &str = "/api/v2";

/// Builds the full application: authenticated API routes under
/// [`API_BASE_PATH`], an open health check and the JSON fallbacks.
pub fn build_app(state: AppState) -> Router {
    let api = routes::create_router(state.clone());

    Router::new()
        .nest(API_BASE_PATH, api)
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
