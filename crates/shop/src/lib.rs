//! Wildbriar shop core.
//!
//! The cart and checkout consistency model for the wreath shop: cart identity
//! resolution, guest-to-user cart merge, pricing/delivery computation, and the
//! transactional order commit with stock adjustment and order-number
//! allocation. Presentation, routing, and payment processing live elsewhere;
//! this crate only talks to PostgreSQL.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::ShopError;
