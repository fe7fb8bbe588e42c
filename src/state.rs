// src/state.rs
use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{InMemoryStore, PgStore, ProductRepository, SaleRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn with_postgres(db_pool: PgPool, jwt_secret: &str) -> Self {
        let store = Arc::new(PgStore::new(db_pool));
        Self {
            products: store.clone(),
            sales: store.clone(),
            users: store,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn with_memory(store: Arc<InMemoryStore>, jwt_secret: &str) -> Self {
        Self {
            products: store.clone(),
            sales: store.clone(),
            users: store,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
