//! Core types for Wildbriar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod delivery;
pub mod id;
pub mod identity;
pub mod order_number;
pub mod payment;
pub mod price;
pub mod session;
pub mod status;

pub use contact::{Email, EmailError};
pub use delivery::{DeliveryMethod, SizeCategory};
pub use id::*;
pub use identity::CartIdentity;
pub use order_number::{OrderNumber, OrderNumberError};
pub use payment::{PaymentMethod, PaymentReference};
pub use price::Price;
pub use session::SessionToken;
pub use status::{OrderStatus, ProductStatus};
