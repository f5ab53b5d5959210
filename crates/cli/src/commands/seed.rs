//! Seed the catalogue with demonstration wreaths.
//!
//! Intended for local development and demos; inserts a small set of active
//! products across both delivery size tiers so cart and checkout flows can be
//! exercised immediately.

use tracing::info;

use wildbriar_core::{Price, ProductStatus, SizeCategory};
use wildbriar_shop::config::ShopConfig;
use wildbriar_shop::db::{ProductRepository, create_pool};
use wildbriar_shop::models::NewProduct;

/// Demonstration catalogue: (title, category, price in pence, stock, size).
const DEMO_WREATHS: &[(&str, &str, i64, i32, SizeCategory)] = &[
    ("Winter Berry Wreath", "door", 6500, 5, SizeCategory::Large),
    ("Frosted Pine Wreath", "door", 5500, 8, SizeCategory::Large),
    ("Dried Lavender Ring", "table", 3500, 12, SizeCategory::Small),
    ("Eucalyptus Hoop", "table", 2800, 10, SizeCategory::Small),
    ("Autumn Hedgerow Wreath", "door", 4800, 6, SizeCategory::Large),
    ("Everlasting Posy Ring", "table", 3200, 9, SizeCategory::Small),
];

/// Insert the demonstration catalogue.
///
/// # Errors
///
/// Returns an error if configuration is missing or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ShopConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    let products = ProductRepository::new(&pool);

    for &(title, category, pence, stock, size_category) in DEMO_WREATHS {
        let product = products
            .create(&NewProduct {
                title: title.to_owned(),
                description: None,
                category: Some(category.to_owned()),
                price: Price::from_pence(pence),
                stock,
                size_category,
                status: ProductStatus::Active,
                image_url: None,
            })
            .await?;
        info!(id = %product.id, title, price = %product.price, "seeded product");
    }

    info!(count = DEMO_WREATHS.len(), "catalogue seeded");
    Ok(())
}
