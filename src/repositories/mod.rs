//! Storage seams for the catalog, the sales ledger and user lookups.
//!
//! Handlers only see these traits through [`crate::state::AppState`]; the
//! concrete store is picked at startup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::product::{NewProduct, Product};
use crate::models::sale::Sale;
use crate::models::user::User;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("product not found")]
    ProductNotFound,
    #[error("insufficient stock")]
    InsufficientStock,
    #[error("product is referenced by at least one sale")]
    HasSales,
    #[error("product name already exists")]
    DuplicateName,
    #[error("stored role `{0}` is not recognised")]
    InvalidRole(String),
    #[error("store lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepoError>;

    async fn create(&self, product: NewProduct) -> Result<Product, RepoError>;

    /// Replaces every editable field. `Ok(None)` when the id is unknown.
    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepoError>;

    /// Fails with [`RepoError::HasSales`] while any sale references the product.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Checks admissibility, decrements stock and appends the sale as one
    /// atomic step. Concurrent calls for the same product are serialized.
    async fn record(&self, product_id: i64, user_id: i64, quantity: i32) -> Result<Sale, RepoError>;

    async fn list(&self) -> Result<Vec<Sale>, RepoError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Sale>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, RepoError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}
