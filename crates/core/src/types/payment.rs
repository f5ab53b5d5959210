//! Payment tags and references.
//!
//! Payment itself happens in an external processor's redirect/SDK flow. This
//! core records which processor was used and the opaque confirmation id it
//! returned; it performs no verification.

use serde::{Deserialize, Serialize};

/// Supported payment processors, treated as opaque tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Paypal,
    Sumup,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paypal => write!(f, "paypal"),
            Self::Sumup => write!(f, "sumup"),
        }
    }
}

/// An opaque payment confirmation id from the external processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Wrap a raw confirmation id.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PaymentReference {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}
