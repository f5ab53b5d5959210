//! Integration tests for Wildbriar.
//!
//! These tests exercise the cart and checkout flows against a real
//! `PostgreSQL` instance.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable database
//! export TEST_DATABASE_URL=postgres://localhost/wildbriar_test
//!
//! cargo test -p wildbriar-integration-tests
//! ```
//!
//! When `TEST_DATABASE_URL` is unset every test skips, so the suite stays
//! green in environments without a database. Each test works with freshly
//! generated identities and products, so tests neither interfere with each
//! other nor require a clean database between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rand::Rng;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use wildbriar_core::{CartIdentity, Price, ProductStatus, SessionToken, SizeCategory, UserId};
use wildbriar_shop::db::ProductRepository;
use wildbriar_shop::models::{NewProduct, Product};

/// Shared context for database-backed tests.
pub struct TestContext {
    /// Pool connected to the test database, with migrations applied.
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database and apply migrations.
    ///
    /// Returns `None` when `TEST_DATABASE_URL` is unset so callers can skip.
    ///
    /// # Panics
    ///
    /// Panics if the database is unreachable or migrations fail: a configured
    /// but broken test database is a test failure, not a skip.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("failed to connect to TEST_DATABASE_URL");

        sqlx::migrate!("../shop/migrations")
            .run(&pool)
            .await
            .expect("failed to apply migrations");

        Some(Self { pool })
    }

    /// A fresh guest identity that no other test shares.
    #[must_use]
    pub fn guest_identity() -> CartIdentity {
        CartIdentity::Session(SessionToken::new(Uuid::new_v4().to_string()))
    }

    /// A fresh user id that no other test shares (with overwhelming
    /// probability; ids come from a 31-bit random draw).
    #[must_use]
    pub fn fresh_user_id() -> UserId {
        UserId::new(rand::rng().random_range(1..i32::MAX))
    }

    /// Insert an active product for this test.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn product(&self, pence: i64, stock: i32, size_category: SizeCategory) -> Product {
        ProductRepository::new(&self.pool)
            .create(&NewProduct {
                title: format!("Test Wreath {}", Uuid::new_v4()),
                description: None,
                category: Some("door".to_owned()),
                price: Price::from_pence(pence),
                stock,
                size_category,
                status: ProductStatus::Active,
                image_url: None,
            })
            .await
            .expect("failed to insert test product")
    }
}

/// Skip the current test (with a note) when no test database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        match $crate::TestContext::new().await {
            Some(ctx) => ctx,
            None => {
                eprintln!("skipping: TEST_DATABASE_URL not set");
                return;
            }
        }
    };
}
