//! Business services over the repositories.
//!
//! - [`cart`] - Cart mutations, validation, and the merge-on-login entry point
//! - [`pricing`] - Pure subtotal/delivery/total computation
//! - [`checkout`] - Transactional order commit and fulfillment status changes

pub mod cart;
pub mod checkout;
pub mod pricing;

pub use cart::CartService;
pub use checkout::{CheckoutReceipt, CheckoutRequest, CheckoutService};
pub use pricing::{CartTotals, PricedCart};
