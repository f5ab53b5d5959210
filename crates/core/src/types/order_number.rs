//! Human-readable order numbers.
//!
//! Format: `WB-<time token>-<random token>`, e.g. `WB-MEB3K2QT-7XQ4`. The time
//! token is the commit instant in base-36 milliseconds, the random token adds
//! enough entropy that back-to-back commits never collide in practice. The
//! checkout service still retries on a unique-index conflict.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// The value does not start with the shop prefix.
    #[error("order number must start with {prefix}-", prefix = OrderNumber::PREFIX)]
    MissingPrefix,
    /// The value is not prefix + two non-empty alphanumeric tokens.
    #[error("order number must be {prefix}-<time>-<random>", prefix = OrderNumber::PREFIX)]
    Malformed,
}

/// A unique, human-readable order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Shop prefix for all order numbers.
    pub const PREFIX: &'static str = "WB";

    /// Build an order number from its time and random tokens.
    #[must_use]
    pub fn from_parts(time_token: &str, random_token: &str) -> Self {
        Self(format!("{}-{time_token}-{random_token}", Self::PREFIX))
    }

    /// Parse and validate an order number.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError`] if the value does not match
    /// `WB-<alphanumeric>-<alphanumeric>`.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let rest = s
            .strip_prefix(Self::PREFIX)
            .and_then(|r| r.strip_prefix('-'))
            .ok_or(OrderNumberError::MissingPrefix)?;

        let mut tokens = rest.split('-');
        let (time_token, random_token) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(t), Some(r), None) => (t, r),
            _ => return Err(OrderNumberError::Malformed),
        };

        let alnum = |t: &str| !t.is_empty() && t.chars().all(|c| c.is_ascii_alphanumeric());
        if alnum(time_token) && alnum(random_token) {
            Ok(Self(s.to_owned()))
        } else {
            Err(OrderNumberError::Malformed)
        }
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the order number and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_round_trips() {
        let number = OrderNumber::from_parts("MEB3K2QT", "7XQ4");
        assert_eq!(number.as_str(), "WB-MEB3K2QT-7XQ4");
        assert_eq!(OrderNumber::parse(number.as_str()), Ok(number));
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        assert_eq!(
            OrderNumber::parse("XX-ABC-1234"),
            Err(OrderNumberError::MissingPrefix)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(OrderNumber::parse("WB-ABC"), Err(OrderNumberError::Malformed));
        assert_eq!(
            OrderNumber::parse("WB-ABC-12-34"),
            Err(OrderNumberError::Malformed)
        );
        assert_eq!(OrderNumber::parse("WB--1234"), Err(OrderNumberError::Malformed));
        assert_eq!(
            OrderNumber::parse("WB-AB C-1234"),
            Err(OrderNumberError::Malformed)
        );
    }
}
