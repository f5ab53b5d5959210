//! Checkout commit and fulfillment status changes.
//!
//! `commit` converts a priced cart into an immutable order in a single
//! transaction: order insert, item snapshots, stock decrements, and cart
//! deletion happen as one unit or not at all. Payment has already happened in
//! the external processor's flow; only the confirmation id is recorded here.

use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;

use wildbriar_core::{
    CartIdentity, DeliveryMethod, OrderId, OrderNumber, OrderStatus, PaymentMethod,
    PaymentReference,
};

use crate::db::{CartRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::ShopError;
use crate::models::cart::CartLineDetail;
use crate::models::order::{CustomerDetails, NewOrder, OrderItem, ShippingAddress};
use crate::services::pricing::{self, CartTotals};

/// Attempts to allocate a unique order number before giving up.
const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Length of the random token in an order number.
const RANDOM_TOKEN_LEN: usize = 8;

/// Digits for the base-36 time token and the random token.
const ORDER_NUMBER_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Everything the caller supplies at checkout besides the cart itself.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Customer contact details.
    pub customer: CustomerDetails,
    /// Shipping address; required for standard delivery, ignored for
    /// collection.
    pub shipping_address: Option<ShippingAddress>,
    /// How the order reaches the customer.
    pub delivery_method: DeliveryMethod,
    /// Which payment processor was used.
    pub payment_method: PaymentMethod,
    /// Opaque confirmation id from the payment processor.
    pub payment_reference: PaymentReference,
}

/// What the caller gets back from a successful commit.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// Database id of the new order.
    pub order_id: OrderId,
    /// Allocated human-readable order number.
    pub order_number: OrderNumber,
    /// The totals the order was committed with.
    pub totals: CartTotals,
}

/// Checkout operations.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Commit the identity's cart as an order.
    ///
    /// In one transaction: the cart is re-read and re-priced under product row
    /// locks, the order and its line snapshots are inserted with status
    /// `pending`, each product's stock is decremented floored at zero (zero
    /// stock flips the product to sold-out), and the cart record is deleted.
    /// An order-number collision rolls the transaction back and retries with a
    /// fresh number.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::MissingShippingAddress` if standard delivery was
    /// requested without an address; nothing is mutated in that case.
    /// Returns `ShopError::EmptyCart` if the identity has no cart or an empty
    /// one.
    /// Returns `ShopError::ProductNotFound` if a product referenced by a line
    /// no longer exists.
    /// Returns `ShopError::OrderNumberExhausted` if no unique order number
    /// could be allocated.
    /// Returns `ShopError::Repository` for database failures.
    #[instrument(skip(self, identity, request))]
    pub async fn commit(
        &self,
        identity: &CartIdentity,
        request: &CheckoutRequest,
    ) -> Result<CheckoutReceipt, ShopError> {
        let shipping_address = match request.delivery_method {
            DeliveryMethod::Standard => Some(
                request
                    .shipping_address
                    .clone()
                    .ok_or(ShopError::MissingShippingAddress)?,
            ),
            // An address supplied alongside collection is not stored.
            DeliveryMethod::Collection => None,
        };

        for _attempt in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

            let lines = CartRepository::detailed_lines_with(&mut tx, identity).await?;
            if lines.is_empty() {
                return Err(ShopError::EmptyCart);
            }

            let totals = pricing::price_cart(&lines, request.delivery_method);
            let order_number = generate_order_number();

            let new_order = NewOrder {
                number: order_number.clone(),
                customer: request.customer.clone(),
                shipping_address: shipping_address.clone(),
                delivery_method: request.delivery_method,
                subtotal: totals.subtotal,
                delivery: totals.delivery,
                total: totals.total,
                payment_method: request.payment_method,
                payment_reference: request.payment_reference.clone(),
                items: lines.iter().map(snapshot_line).collect(),
            };

            let order_id = match OrderRepository::insert_with(&mut tx, &new_order).await {
                Ok(order_id) => order_id,
                Err(RepositoryError::Conflict(_)) => {
                    tx.rollback().await.map_err(RepositoryError::from)?;
                    tracing::warn!(number = %order_number, "order number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for line in &lines {
                let product = ProductRepository::lock_for_update(&mut tx, line.product_id)
                    .await?
                    .ok_or(ShopError::ProductNotFound(line.product_id))?;
                let adjustment = product.apply_stock_decrement(line.quantity);
                ProductRepository::apply_stock(&mut tx, line.product_id, adjustment).await?;
            }

            CartRepository::delete_with(&mut tx, identity).await?;
            tx.commit().await.map_err(RepositoryError::from)?;

            tracing::info!(order_id = %order_id, number = %order_number, "order committed");
            return Ok(CheckoutReceipt {
                order_id,
                order_number,
                totals,
            });
        }

        Err(ShopError::OrderNumberExhausted)
    }

    /// Advance an order's fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::OrderNotFound` if the order does not exist.
    /// Returns `ShopError::InvalidStatusTransition` if the state machine
    /// forbids the move.
    /// Returns `ShopError::Repository` for database failures.
    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<(), ShopError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let current = OrderRepository::status_for_update(&mut tx, order_id)
            .await?
            .ok_or(ShopError::OrderNotFound(order_id))?;

        if !current.can_transition_to(next) {
            return Err(ShopError::InvalidStatusTransition {
                from: current,
                to: next,
            });
        }

        OrderRepository::set_status(&mut tx, order_id, next).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(())
    }
}

/// Capture a cart line as an immutable order item snapshot.
fn snapshot_line(line: &CartLineDetail) -> OrderItem {
    OrderItem {
        product_id: line.product_id,
        title: line.title.clone(),
        unit_price: line.unit_price,
        quantity: line.quantity,
        image_url: line.image_url.clone(),
    }
}

/// Generate an order number: prefix + base-36 millisecond timestamp + random
/// token. The random token makes same-millisecond commits distinct; the
/// database unique index backstops the residual collision odds.
fn generate_order_number() -> OrderNumber {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let time_token = to_base36(millis);

    let mut rng = rand::rng();
    let random_token: String = (0..RANDOM_TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ORDER_NUMBER_ALPHABET.len());
            char::from(ORDER_NUMBER_ALPHABET.get(idx).copied().unwrap_or(b'0'))
        })
        .collect();

    OrderNumber::from_parts(&time_token, &random_token)
}

/// Render a value in uppercase base 36.
fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or(0);
        digits.push(ORDER_NUMBER_ALPHABET.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use wildbriar_core::{Email, SessionToken};

    use super::*;

    // The address check rejects before any database work, so a lazy
    // (never-connected) pool is enough to exercise it.
    #[tokio::test]
    async fn test_standard_delivery_requires_an_address() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction does not connect");
        let service = CheckoutService::new(&pool);
        let identity = CartIdentity::Session(SessionToken::new("guest"));

        let request = CheckoutRequest {
            customer: CustomerDetails {
                name: "Holly Carpenter".to_owned(),
                email: Email::parse("holly@example.com").expect("valid email"),
                phone: None,
            },
            shipping_address: None,
            delivery_method: DeliveryMethod::Standard,
            payment_method: PaymentMethod::Paypal,
            payment_reference: PaymentReference::new("ref-1"),
        };

        let err = service
            .commit(&identity, &request)
            .await
            .expect_err("standard delivery without an address must be rejected");
        assert!(matches!(err, ShopError::MissingShippingAddress));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }

    #[test]
    fn test_generated_numbers_are_well_formed() {
        let number = generate_order_number();
        let parsed = OrderNumber::parse(number.as_str()).expect("generated number must parse");
        assert_eq!(parsed, number);
        assert!(number.as_str().starts_with("WB-"));
    }

    #[test]
    fn test_generated_numbers_are_unique() {
        // Back-to-back generation must not collide in practice.
        let numbers: HashSet<String> = (0..10_000)
            .map(|_| generate_order_number().into_inner())
            .collect();
        assert_eq!(numbers.len(), 10_000);
    }
}
