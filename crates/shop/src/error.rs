//! Shop-level error type.
//!
//! Validation failures are reported synchronously with enough detail for a
//! user-facing message. Removal-style cart operations never error on missing
//! state; those are no-ops by contract.

use thiserror::Error;

use wildbriar_core::{OrderId, OrderStatus, ProductId};

use crate::db::RepositoryError;

/// Errors surfaced by the cart and checkout services.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Requested quantity was below 1 on add-to-cart.
    #[error("invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: i32,
    },

    /// Checkout was attempted with no cart or an empty cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Standard delivery was requested without a shipping address.
    #[error("standard delivery requires a shipping address")]
    MissingShippingAddress,

    /// A product referenced by a checkout line no longer exists.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// The fulfillment state machine forbids this status change.
    #[error("invalid order status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: OrderStatus,
        /// Rejected target status.
        to: OrderStatus,
    },

    /// Ran out of attempts to allocate a unique order number.
    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShopError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "invalid quantity 0: must be at least 1");

        let err = ShopError::ProductNotFound(ProductId::new(12));
        assert_eq!(err.to_string(), "product 12 not found");

        let err = ShopError::MissingShippingAddress;
        assert_eq!(err.to_string(), "standard delivery requires a shipping address");

        let err = ShopError::InvalidStatusTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "invalid order status transition: delivered -> pending"
        );
    }
}
