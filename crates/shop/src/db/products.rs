//! Product repository.
//!
//! This core reads products and decrements stock at checkout; catalogue
//! management (create/edit) is an external admin concern. `create` exists for
//! seeding and tests.

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use wildbriar_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, StockAdjustment};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category, price, stock,
                   size_category, status, image_url, created_at, updated_at
            FROM shop.products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// List active products, optionally filtered by category.
    ///
    /// The category predicate runs in SQL against the (status, category)
    /// index, not as an in-memory filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_active(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, category, price, stock,
                   size_category, status, image_url, created_at, updated_at
            FROM shop.products
            WHERE status = 'active'
              AND ($1::text IS NULL OR category = $1)
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Insert a new product (seeding and tests).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, params), fields(title = %params.title))]
    pub async fn create(&self, params: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO shop.products
                (title, description, category, price, stock, size_category, status, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, category, price, stock,
                      size_category, status, image_url, created_at, updated_at
            ",
        )
        .bind(&params.title)
        .bind(params.description.as_deref())
        .bind(params.category.as_deref())
        .bind(params.price.amount())
        .bind(params.stock)
        .bind(params.size_category)
        .bind(params.status)
        .bind(params.image_url.as_deref())
        .fetch_one(self.pool)
        .await?;

        product_from_row(&row)
    }

    /// Fetch a product and lock its row for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn lock_for_update(
        conn: &mut PgConnection,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category, price, stock,
                   size_category, status, image_url, created_at, updated_at
            FROM shop.products
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Apply a computed stock adjustment to a locked product row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub(crate) async fn apply_stock(
        conn: &mut PgConnection,
        id: ProductId,
        adjustment: StockAdjustment,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.products
            SET stock = $2, status = $3, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(adjustment.new_stock)
        .bind(adjustment.new_status)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map a product row to the domain type.
fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        price: Price::new(row.try_get("price")?),
        stock: row.try_get("stock")?,
        size_category: row.try_get("size_category")?,
        status: row.try_get("status")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
