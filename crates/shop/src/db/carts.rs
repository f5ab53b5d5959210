//! Cart repository.
//!
//! Carts are keyed by exactly one of user id or session token. The identity
//! predicate relies on `col = NULL` never matching, so the unpopulated side of
//! the key never selects a row. Associated functions taking a connection run
//! inside a caller-owned transaction (checkout spans cart read, order insert,
//! stock decrement, and cart delete in one unit).

use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use wildbriar_core::{CartId, CartIdentity, ProductId, SessionToken, UserId};

use super::RepositoryError;
use crate::models::cart::{CartLine, CartLineDetail};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the cart lines for an identity. An absent cart reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, identity))]
    pub async fn lines(&self, identity: &CartIdentity) -> Result<Vec<CartLine>, RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);
        let rows = sqlx::query(
            r"
            SELECT i.product_id, i.quantity
            FROM shop.cart_items i
            JOIN shop.carts c ON c.id = i.cart_id
            WHERE (c.user_id = $1 OR c.session_token = $2)
            ORDER BY i.id
            ",
        )
        .bind(user_id)
        .bind(session_token)
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(CartLine {
                    product_id: row.try_get("product_id")?,
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect()
    }

    /// Get the cart lines joined with the product data pricing needs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, identity))]
    pub async fn detailed_lines(
        &self,
        identity: &CartIdentity,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::detailed_lines_with(&mut conn, identity).await
    }

    /// Transaction-scoped variant of [`Self::detailed_lines`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn detailed_lines_with(
        conn: &mut PgConnection,
        identity: &CartIdentity,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);
        let rows = sqlx::query(
            r"
            SELECT i.product_id, i.quantity, p.title, p.price, p.size_category, p.image_url
            FROM shop.cart_items i
            JOIN shop.carts c ON c.id = i.cart_id
            JOIN shop.products p ON p.id = i.product_id
            WHERE (c.user_id = $1 OR c.session_token = $2)
            ORDER BY i.id
            ",
        )
        .bind(user_id)
        .bind(session_token)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(CartLineDetail {
                    product_id: row.try_get("product_id")?,
                    title: row.try_get("title")?,
                    unit_price: wildbriar_core::Price::new(row.try_get("price")?),
                    quantity: row.try_get("quantity")?,
                    size_category: row.try_get("size_category")?,
                    image_url: row.try_get("image_url")?,
                })
            })
            .collect()
    }

    /// Add `quantity` units of a product to the identity's cart.
    ///
    /// Creates the cart record on first use. A line for the product already
    /// present has its quantity incremented; otherwise a new line is appended.
    /// Quantity validation (>= 1) happens in the service layer before this is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, identity))]
    pub async fn add_item(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id = Self::find_or_create(&mut tx, identity).await?;

        sqlx::query(
            r"
            INSERT INTO shop.cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        touch(&mut tx, cart_id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Set a line's quantity. Missing cart or line is a no-op.
    ///
    /// Quantities below 1 are handled by the service layer as removal before
    /// this is called.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, identity))]
    pub async fn update_quantity(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);
        sqlx::query(
            r"
            UPDATE shop.cart_items AS i
            SET quantity = $4
            FROM shop.carts c
            WHERE i.cart_id = c.id
              AND (c.user_id = $1 OR c.session_token = $2)
              AND i.product_id = $3
            ",
        )
        .bind(user_id)
        .bind(session_token)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a line if present; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, identity))]
    pub async fn remove_item(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);
        sqlx::query(
            r"
            DELETE FROM shop.cart_items AS i
            USING shop.carts c
            WHERE i.cart_id = c.id
              AND (c.user_id = $1 OR c.session_token = $2)
              AND i.product_id = $3
            ",
        )
        .bind(user_id)
        .bind(session_token)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete the identity's cart record entirely (lines cascade).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, identity))]
    pub async fn clear(&self, identity: &CartIdentity) -> Result<(), RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_with(&mut conn, identity).await
    }

    /// Transaction-scoped cart deletion (used by checkout commit).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn delete_with(
        conn: &mut PgConnection,
        identity: &CartIdentity,
    ) -> Result<(), RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);
        sqlx::query("DELETE FROM shop.carts WHERE (user_id = $1 OR session_token = $2)")
            .bind(user_id)
            .bind(session_token)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Merge a guest session's cart into a user's cart at login.
    ///
    /// - absent or empty guest cart: no-op, which also makes a retried merge
    ///   harmless after the guest cart has been deleted
    /// - user has no cart: the guest cart row is reassigned to the user
    /// - otherwise each guest line is upserted into the user's cart as a
    ///   quantity increment and the guest cart deleted
    ///
    /// The increment form commutes with a concurrent `add_item` on the user's
    /// cart, so neither write is lost whichever transaction commits first.
    ///
    /// Merged quantities are not capped against stock; shortfalls surface at
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    #[instrument(skip(self, session_token))]
    pub async fn merge(
        &self,
        user_id: UserId,
        session_token: &SessionToken,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let guest_cart: Option<(CartId,)> =
            sqlx::query_as("SELECT id FROM shop.carts WHERE session_token = $1 FOR UPDATE")
                .bind(session_token.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((guest_cart_id,)) = guest_cart else {
            return Ok(());
        };

        let guest_lines = lines_by_cart(&mut tx, guest_cart_id).await?;
        if guest_lines.is_empty() {
            return Ok(());
        }

        // The user's cart row stays unlocked: guest lines are applied as
        // increments below, and the line upsert then the cart touch acquire
        // row locks in the same order `add_item` does.
        let user_cart: Option<(CartId,)> =
            sqlx::query_as("SELECT id FROM shop.carts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        match user_cart {
            None => {
                // Ownership transfer: the guest cart becomes the user's cart.
                sqlx::query(
                    r"
                    UPDATE shop.carts
                    SET user_id = $1, session_token = NULL, updated_at = now()
                    WHERE id = $2
                    ",
                )
                .bind(user_id)
                .bind(guest_cart_id)
                .execute(&mut *tx)
                .await?;
            }
            Some((user_cart_id,)) => {
                for line in &guest_lines {
                    sqlx::query(
                        r"
                        INSERT INTO shop.cart_items (cart_id, product_id, quantity)
                        VALUES ($1, $2, $3)
                        ON CONFLICT (cart_id, product_id)
                        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                        ",
                    )
                    .bind(user_cart_id)
                    .bind(line.product_id)
                    .bind(line.quantity)
                    .execute(&mut *tx)
                    .await?;
                }

                sqlx::query("DELETE FROM shop.carts WHERE id = $1")
                    .bind(guest_cart_id)
                    .execute(&mut *tx)
                    .await?;

                touch(&mut tx, user_cart_id).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Find the identity's cart id, creating the cart record if needed.
    async fn find_or_create(
        conn: &mut PgConnection,
        identity: &CartIdentity,
    ) -> Result<CartId, RepositoryError> {
        let (user_id, session_token) = identity_binds(identity);

        sqlx::query(
            r"
            INSERT INTO shop.carts (user_id, session_token)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(session_token)
        .execute(&mut *conn)
        .await?;

        let (cart_id,): (CartId,) =
            sqlx::query_as("SELECT id FROM shop.carts WHERE (user_id = $1 OR session_token = $2)")
                .bind(user_id)
                .bind(session_token)
                .fetch_one(&mut *conn)
                .await?;

        Ok(cart_id)
    }
}

/// Split an identity into the (user id, session token) bind pair.
fn identity_binds(identity: &CartIdentity) -> (Option<i32>, Option<&str>) {
    (
        identity.user_id().map(|id| id.as_i32()),
        identity.session_token().map(SessionToken::as_str),
    )
}

/// Fetch the lines of a cart by its id (within a transaction).
async fn lines_by_cart(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let rows = sqlx::query(
        r"
        SELECT product_id, quantity
        FROM shop.cart_items
        WHERE cart_id = $1
        ORDER BY id
        ",
    )
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(CartLine {
                product_id: row.try_get("product_id")?,
                quantity: row.try_get("quantity")?,
            })
        })
        .collect()
}

/// Bump a cart's `updated_at`.
async fn touch(conn: &mut PgConnection, cart_id: CartId) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE shop.carts SET updated_at = now() WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
