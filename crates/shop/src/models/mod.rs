//! Domain models for the shop core.
//!
//! These are validated domain objects, separate from database row shapes;
//! the repositories in [`crate::db`] translate between the two.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{CartLine, CartLineDetail, merge_quantities};
pub use order::{CustomerDetails, NewOrder, Order, OrderItem, ShippingAddress};
pub use product::{NewProduct, Product, StockAdjustment};
