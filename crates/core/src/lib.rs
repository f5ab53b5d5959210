//! Wildbriar Core - Shared types library.
//!
//! This crate provides common types used across all Wildbriar components:
//! - `shop` - Cart and checkout business core
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. Anything
//! that talks to PostgreSQL lives in the `shop` crate; enabling the `postgres`
//! feature here only adds sqlx trait implementations to the types.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, identities, and
//!   the order/product status enumerations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
