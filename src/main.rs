// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use storefront_api::config::{Config, StorageKind};
use storefront_api::repositories::InMemoryStore;
use storefront_api::state::AppState;
use storefront_api::{build_app, database};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    // Create application state
    let app_state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise storage");
            return;
        }
    };

    let app = build_app(app_state);

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", config.port, config.host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}

async fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    match config.storage {
        StorageKind::Postgres => {
            let database_url = config.database_url.as_deref().ok_or("DATABASE_URL must be set")?;
            let db_pool = database::create_pool(database_url, config.max_connections).await?;
            Ok(AppState::with_postgres(db_pool, &config.jwt_secret))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(InMemoryStore::new());
            for (email, role) in &config.seed_users {
                store.insert_user(email, *role)?;
                tracing::info!(%email, %role, "Seeded user");
            }
            Ok(AppState::with_memory(store, &config.jwt_secret))
        }
    }
}
