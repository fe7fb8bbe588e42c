use async_trait::async_trait;
use sqlx::{Error as SqlxError, PgPool};
use tracing::{instrument, warn};

use super::{ProductRepository, RepoError, SaleRepository, UserRepository};
use crate::auth::role::Role;
use crate::models::product::{NewProduct, Product};
use crate::models::sale::Sale;
use crate::models::user::{User, UserRow};
use crate::services::stock::{self, Admission};

const PRODUCT_COLUMNS: &str = "id, name, price, quantity, minimum_allowed, created_at";
const SALE_COLUMNS: &str = "id, user_id, product_id, quantity, unit_price, created_at";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn map_constraint_violation(err: SqlxError) -> RepoError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            RepoError::DuplicateName
        }
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            RepoError::HasSales
        }
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepoError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepoError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: NewProduct) -> Result<Product, RepoError> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, quantity, minimum_allowed)
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.minimum_allowed)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepoError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
             name = $1,
             price = $2,
             quantity = $3,
             minimum_allowed = $4
             WHERE id = $5 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.minimum_allowed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so no sale can land between the check and the delete.
        sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepoError::ProductNotFound)?;

        let has_sales = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM sales WHERE product_id = $1)"
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if has_sales {
            return Err(RepoError::HasSales);
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_constraint_violation)?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SaleRepository for PgStore {
    #[instrument(skip(self))]
    async fn record(&self, product_id: i64, user_id: i64, quantity: i32) -> Result<Sale, RepoError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent sales of the same product.
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::ProductNotFound)?;

        let remaining = match stock::evaluate_product(&product, quantity) {
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

        sqlx::query("UPDATE products SET quantity = $1 WHERE id = $2")
            .bind(remaining)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let sale = sqlx::query_as::<_, Sale>(&format!(
            "INSERT INTO sales (user_id, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4) RETURNING {SALE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(product.price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(sale)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Sale>, RepoError> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Sale>, RepoError> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, RepoError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, email, role FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<User, RepoError> {
            let role: Role = row.role.parse().map_err(|_| RepoError::InvalidRole(row.role.clone()))?;
            Ok(User { id: row.id, email: row.email, role })
        })
        .transpose()
    }
}
