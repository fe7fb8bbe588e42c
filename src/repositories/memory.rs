use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use super::{ProductRepository, RepoError, SaleRepository, UserRepository};
use crate::auth::role::Role;
use crate::models::product::{NewProduct, Product};
use crate::models::sale::Sale;
use crate::models::user::User;
use crate::services::stock::{self, Admission};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    sales: BTreeMap<i64, Sale>,
    users: BTreeMap<i64, User>,
    next_product_id: i64,
    next_sale_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory store backing every repository trait.
///
/// Intended for tests/dev. One lock guards all tables, so each operation is
/// atomic with respect to every other.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepoError> {
        self.tables.read().map_err(|_| RepoError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepoError> {
        self.tables.write().map_err(|_| RepoError::Poisoned)
    }

    /// Users are owned by another system; this seeds them for dev and tests.
    pub fn insert_user(&self, email: &str, role: Role) -> Result<User, RepoError> {
        let mut tables = self.write()?;
        let id = next_id(&mut tables.next_user_id);
        let user = User { id, email: email.to_string(), role };
        tables.users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepoError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepoError> {
        Ok(self.read()?.products.values().find(|p| p.name == name).cloned())
    }

    async fn create(&self, product: NewProduct) -> Result<Product, RepoError> {
        let mut tables = self.write()?;
        if tables.name_taken(&product.name, None) {
            return Err(RepoError::DuplicateName);
        }

        let id = next_id(&mut tables.next_product_id);
        let created = Product {
            id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            minimum_allowed: product.minimum_allowed,
            created_at: Some(Utc::now()),
        };
        tables.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepoError> {
        let mut tables = self.write()?;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        if tables.name_taken(&product.name, Some(id)) {
            return Err(RepoError::DuplicateName);
        }

        let existing = tables.products.get_mut(&id).ok_or(RepoError::ProductNotFound)?;
        existing.name = product.name;
        existing.price = product.price;
        existing.quantity = product.quantity;
        existing.minimum_allowed = product.minimum_allowed;
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.write()?;
        if !tables.products.contains_key(&id) {
            return Err(RepoError::ProductNotFound);
        }
        if tables.sales.values().any(|s| s.product_id == id) {
            return Err(RepoError::HasSales);
        }
        tables.products.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SaleRepository for InMemoryStore {
    async fn record(&self, product_id: i64, user_id: i64, quantity: i32) -> Result<Sale, RepoError> {
        let mut tables = self.write()?;

        let product = tables
            .products
            .get_mut(&product_id)
            .ok_or(RepoError::ProductNotFound)?;

        let remaining = match stock::evaluate_product(product, quantity) {
            Admission::Admitted { remaining } => remaining,
            Admission::InsufficientStock => {
                warn!(
                    product_id,
                    in_stock = product.quantity,
                    minimum_allowed = product.minimum_allowed,
                    requested = quantity,
                    "Sale rejected"
                );
                return Err(RepoError::InsufficientStock);
            }
        };
        product.quantity = remaining;
        let unit_price = product.price;

        let id = next_id(&mut tables.next_sale_id);
        let sale = Sale {
            id,
            user_id,
            product_id,
            quantity,
            unit_price,
            created_at: Some(Utc::now()),
        };
        tables.sales.insert(id, sale.clone());
        Ok(sale)
    }

    async fn list(&self) -> Result<Vec<Sale>, RepoError> {
        Ok(self.read()?.sales.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Sale>, RepoError> {
        Ok(self
            .read()?
            .sales
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, RepoError> {
        Ok(self.read()?.sales.get(&id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }
}
