//! Cart domain types and line arithmetic.

use wildbriar_core::{Price, ProductId, SizeCategory};

/// A single (product, quantity) line within a cart.
///
/// Product refs are unique within a cart; duplicate adds increment the
/// existing line, and a line never holds a quantity below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// The referenced product.
    pub product_id: ProductId,
    /// Units of the product, always >= 1.
    pub quantity: i32,
}

/// A cart line joined with the product data pricing needs.
#[derive(Debug, Clone)]
pub struct CartLineDetail {
    /// The referenced product.
    pub product_id: ProductId,
    /// Product title at read time.
    pub title: String,
    /// Unit price at read time.
    pub unit_price: Price,
    /// Units of the product.
    pub quantity: i32,
    /// Delivery fee tier of the product.
    pub size_category: SizeCategory,
    /// Optional product image URL.
    pub image_url: Option<String>,
}

impl CartLineDetail {
    /// Price of the whole line (unit price x quantity).
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Merge a guest cart's lines into a user cart's lines.
///
/// Reference arithmetic for the repository's merge, which applies guest lines
/// as per-line quantity increments. User lines keep their order; a guest line
/// for a product the user already has sums the quantities, otherwise the
/// guest line is appended. Quantities are not capped against stock here -
/// shortfalls surface at checkout.
#[must_use]
pub fn merge_quantities(user_lines: &[CartLine], guest_lines: &[CartLine]) -> Vec<CartLine> {
    let mut merged = user_lines.to_vec();
    for guest in guest_lines {
        match merged.iter_mut().find(|l| l.product_id == guest.product_id) {
            Some(line) => line.quantity += guest.quantity,
            None => merged.push(*guest),
        }
    }
    merged
}
