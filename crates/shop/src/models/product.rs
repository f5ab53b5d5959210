//! Product domain types.
//!
//! Products are read-mostly from this core's perspective: creation and editing
//! belong to external product management, while order commit decrements stock.

use chrono::{DateTime, Utc};

use wildbriar_core::{Price, ProductId, ProductStatus, SizeCategory};

/// A wreath product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional catalogue category tag (e.g. "door", "table").
    pub category: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Units in stock; never negative.
    pub stock: i32,
    /// Delivery fee tier classification.
    pub size_category: SizeCategory,
    /// Lifecycle status.
    pub status: ProductStatus,
    /// Optional primary image URL.
    pub image_url: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The stock/status outcome of committing an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    /// Remaining stock after the decrement, floored at zero.
    pub new_stock: i32,
    /// Status after the decrement; `SoldOut` once stock reaches zero.
    pub new_status: ProductStatus,
}

impl Product {
    /// Compute the stock decrement for an ordered quantity.
    ///
    /// Stock is floored at zero rather than rejecting the order; a resulting
    /// stock of zero transitions the product to `SoldOut`, otherwise the
    /// status is left unchanged.
    #[must_use]
    pub fn apply_stock_decrement(&self, quantity: i32) -> StockAdjustment {
        let new_stock = (self.stock - quantity).max(0);
        let new_status = if new_stock == 0 {
            ProductStatus::SoldOut
        } else {
            self.status
        };
        StockAdjustment {
            new_stock,
            new_status,
        }
    }
}

/// Parameters for creating a product (seeding and tests).
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional catalogue category tag.
    pub category: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Initial stock.
    pub stock: i32,
    /// Delivery fee tier classification.
    pub size_category: SizeCategory,
    /// Lifecycle status.
    pub status: ProductStatus,
    /// Optional primary image URL.
    pub image_url: Option<String>,
}
