//! Cart pricing.
//!
//! Pure functions of the cart's lines and the delivery method. Delivery is an
//! order-level flat fee, not summed per line: collection costs nothing, and a
//! single large item anywhere in the order selects the higher tier for the
//! whole order. One fixed currency, no taxes or discounts.

use serde::Serialize;

use wildbriar_core::{DeliveryMethod, Price};

use crate::models::cart::CartLineDetail;

/// Flat delivery fee when any line is in the large size category, in pence.
const LARGE_TIER_FEE_PENCE: i64 = 799;
/// Flat delivery fee when every line is small, in pence.
const SMALL_TIER_FEE_PENCE: i64 = 499;

/// Computed totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of line prices.
    pub subtotal: Price,
    /// Order-level delivery fee.
    pub delivery: Price,
    /// Subtotal plus delivery.
    pub total: Price,
}

/// A cart's lines together with their totals.
#[derive(Debug, Clone)]
pub struct PricedCart {
    /// The lines the totals were computed from.
    pub lines: Vec<CartLineDetail>,
    /// Computed totals.
    pub totals: CartTotals,
}

/// Sum of line prices (unit price x quantity per line).
#[must_use]
pub fn subtotal(lines: &[CartLineDetail]) -> Price {
    lines.iter().map(CartLineDetail::line_price).sum()
}

/// The order-level delivery fee for these lines and delivery method.
#[must_use]
pub fn delivery_fee(lines: &[CartLineDetail], method: DeliveryMethod) -> Price {
    if lines.is_empty() || method == DeliveryMethod::Collection {
        return Price::ZERO;
    }
    if lines.iter().any(|line| line.size_category.is_large()) {
        Price::from_pence(LARGE_TIER_FEE_PENCE)
    } else {
        Price::from_pence(SMALL_TIER_FEE_PENCE)
    }
}

/// Compute subtotal, delivery, and total for a cart.
#[must_use]
pub fn price_cart(lines: &[CartLineDetail], method: DeliveryMethod) -> CartTotals {
    let subtotal = subtotal(lines);
    let delivery = delivery_fee(lines, method);
    CartTotals {
        subtotal,
        delivery,
        total: subtotal + delivery,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildbriar_core::{ProductId, SizeCategory};

    fn line(product: i32, pence: i64, quantity: i32, size: SizeCategory) -> CartLineDetail {
        CartLineDetail {
            product_id: ProductId::new(product),
            title: format!("Wreath {product}"),
            unit_price: Price::from_pence(pence),
            quantity,
            size_category: size,
            image_url: None,
        }
    }

    #[test]
    fn test_worked_example_standard_delivery() {
        // One large at £65 plus two small at £35: subtotal £135, large tier
        // fee applies once for the whole order.
        let lines = [
            line(1, 6500, 1, SizeCategory::Large),
            line(2, 3500, 2, SizeCategory::Small),
        ];
        let totals = price_cart(&lines, DeliveryMethod::Standard);
        assert_eq!(totals.subtotal, Price::from_pence(13500));
        assert_eq!(totals.delivery, Price::from_pence(799));
        assert_eq!(totals.total, Price::from_pence(14299));
        assert_eq!(totals.total.display(), "£142.99");
    }

    #[test]
    fn test_worked_example_collection() {
        let lines = [
            line(1, 6500, 1, SizeCategory::Large),
            line(2, 3500, 2, SizeCategory::Small),
        ];
        let totals = price_cart(&lines, DeliveryMethod::Collection);
        assert_eq!(totals.delivery, Price::ZERO);
        assert_eq!(totals.total, Price::from_pence(13500));
    }

    #[test]
    fn test_all_small_uses_lower_tier() {
        let lines = [line(1, 2500, 1, SizeCategory::Small)];
        let totals = price_cart(&lines, DeliveryMethod::Standard);
        assert_eq!(totals.delivery, Price::from_pence(499));
        assert_eq!(totals.total, Price::from_pence(2999));
    }

    #[test]
    fn test_fee_is_per_order_not_per_large_line() {
        let lines = [
            line(1, 6500, 3, SizeCategory::Large),
            line(2, 8000, 2, SizeCategory::Large),
        ];
        assert_eq!(
            delivery_fee(&lines, DeliveryMethod::Standard),
            Price::from_pence(799)
        );
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let totals = price_cart(&[], DeliveryMethod::Standard);
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.delivery, Price::ZERO);
        assert_eq!(totals.total, Price::ZERO);
    }
}
