//! Delivery classification types.

use serde::{Deserialize, Serialize};

/// Coarse product size classification.
///
/// Used solely to pick the delivery fee tier: one large item anywhere in the
/// order selects the higher flat fee for the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.size_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    #[default]
    Small,
    Large,
}

impl SizeCategory {
    /// Whether this category selects the large-item delivery tier.
    #[must_use]
    pub const fn is_large(self) -> bool {
        matches!(self, Self::Large)
    }
}

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.delivery_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Posted to the shipping address.
    #[default]
    Standard,
    /// Collected from the workshop; no delivery fee, no shipping address.
    Collection,
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Collection => write!(f, "collection"),
        }
    }
}
