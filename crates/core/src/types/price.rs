//! Money amounts with decimal arithmetic.
//!
//! The shop trades in a single currency (GBP), so `Price` carries only the
//! amount. Two-decimal display is the fixed presentation precision.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative GBP amount with exact decimal arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero pounds.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of pence.
    #[must_use]
    pub fn from_pence(pence: i64) -> Self {
        Self(Decimal::new(pence, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with the currency symbol, e.g. `£19.99`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("£{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i32> for Price {
    type Output = Self;

    fn mul(self, qty: i32) -> Self {
        Self(self.0 * Decimal::from(qty))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_pence(6500).to_string(), "£65.00");
        assert_eq!(Price::from_pence(799).display(), "£7.99");
        assert_eq!(Price::ZERO.to_string(), "£0.00");
    }

    #[test]
    fn test_line_arithmetic() {
        let unit = Price::from_pence(3500);
        assert_eq!(unit * 2, Price::from_pence(7000));
        assert_eq!(unit + Price::from_pence(1), Price::from_pence(3501));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_pence(6500), Price::from_pence(7000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_pence(13500));
    }
}
