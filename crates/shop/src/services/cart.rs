//! Cart service.
//!
//! Validates input, resolves which cart record applies, and delegates to the
//! cart repository. The current visitor's identity is always passed in
//! explicitly (resolved by the caller via `CartIdentity::resolve`), never read
//! from ambient state.

use sqlx::PgPool;
use tracing::instrument;

use wildbriar_core::{CartIdentity, DeliveryMethod, ProductId, SessionToken, UserId};

use crate::db::CartRepository;
use crate::error::ShopError;
use crate::models::cart::CartLine;
use crate::services::pricing::{self, PricedCart};

/// Cart operations for the current visitor.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Get the visitor's cart lines. No identity or no cart reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the lookup fails.
    #[instrument(skip(self, identity))]
    pub async fn get(&self, identity: Option<&CartIdentity>) -> Result<Vec<CartLine>, ShopError> {
        match identity {
            Some(identity) => Ok(self.carts.lines(identity).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Get the visitor's cart priced for a delivery method.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the lookup fails.
    #[instrument(skip(self, identity))]
    pub async fn priced(
        &self,
        identity: Option<&CartIdentity>,
        delivery_method: DeliveryMethod,
    ) -> Result<PricedCart, ShopError> {
        let lines = match identity {
            Some(identity) => self.carts.detailed_lines(identity).await?,
            None => Vec::new(),
        };
        let totals = pricing::price_cart(&lines, delivery_method);
        Ok(PricedCart { lines, totals })
    }

    /// Add `quantity` units of a product to the identity's cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidQuantity` if `quantity` is below 1; nothing
    /// is mutated in that case.
    /// Returns `ShopError::Repository` if the product does not exist or the
    /// mutation fails.
    #[instrument(skip(self, identity))]
    pub async fn add_item(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ShopError> {
        if quantity < 1 {
            return Err(ShopError::InvalidQuantity { quantity });
        }
        self.carts.add_item(identity, product_id, quantity).await?;
        Ok(())
    }

    /// Set a line's quantity; a quantity below 1 removes the line.
    ///
    /// Missing cart or line is a no-op, so repeated removal is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the mutation fails.
    #[instrument(skip(self, identity))]
    pub async fn update_quantity(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ShopError> {
        if quantity < 1 {
            self.carts.remove_item(identity, product_id).await?;
        } else {
            self.carts
                .update_quantity(identity, product_id, quantity)
                .await?;
        }
        Ok(())
    }

    /// Remove a line if present; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the mutation fails.
    #[instrument(skip(self, identity))]
    pub async fn remove_item(
        &self,
        identity: &CartIdentity,
        product_id: ProductId,
    ) -> Result<(), ShopError> {
        self.carts.remove_item(identity, product_id).await?;
        Ok(())
    }

    /// Delete the identity's cart record entirely.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the mutation fails.
    #[instrument(skip(self, identity))]
    pub async fn clear(&self, identity: &CartIdentity) -> Result<(), ShopError> {
        self.carts.clear(identity).await?;
        Ok(())
    }

    /// Fold a guest session's cart into the user's cart at login/signup.
    ///
    /// Safe to call again after the guest cart is gone (retried requests):
    /// the merge is a no-op once the guest cart has been deleted.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Repository` if the merge transaction fails.
    #[instrument(skip(self, session_token))]
    pub async fn merge_on_login(
        &self,
        user_id: UserId,
        session_token: &SessionToken,
    ) -> Result<(), ShopError> {
        self.carts.merge(user_id, session_token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Quantity validation rejects before any database work, so a lazy
    // (never-connected) pool is enough to exercise it.
    #[tokio::test]
    async fn test_add_item_rejects_quantity_below_one() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction does not connect");
        let service = CartService::new(&pool);
        let identity = CartIdentity::Session(SessionToken::new("guest"));

        for quantity in [0, -3] {
            let err = service
                .add_item(&identity, ProductId::new(1), quantity)
                .await
                .expect_err("quantity below 1 must be rejected");
            assert!(matches!(err, ShopError::InvalidQuantity { quantity: q } if q == quantity));
        }
    }

    #[tokio::test]
    async fn test_no_identity_reads_as_empty_cart() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction does not connect");
        let service = CartService::new(&pool);
        assert!(service.get(None).await.expect("empty, not error").is_empty());

        let priced = service
            .priced(None, DeliveryMethod::Standard)
            .await
            .expect("empty, not error");
        assert!(priced.lines.is_empty());
        assert_eq!(priced.totals.total, wildbriar_core::Price::ZERO);
    }
}
