//! Guest-to-user cart merge at login.

use wildbriar_core::{CartIdentity, ProductId, SessionToken, SizeCategory};
use wildbriar_integration_tests::{TestContext, require_database};
use wildbriar_shop::models::CartLine;
use wildbriar_shop::services::CartService;

fn quantity_of(lines: &[CartLine], product_id: ProductId) -> Option<i32> {
    lines
        .iter()
        .find(|l| l.product_id == product_id)
        .map(|l| l.quantity)
}

async fn guest_cart_rows(ctx: &TestContext, token: &SessionToken) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM shop.carts WHERE session_token = $1")
        .bind(token.as_str())
        .fetch_one(&ctx.pool)
        .await
        .expect("count guest carts")
}

#[tokio::test]
async fn test_merge_reassigns_guest_cart_when_user_has_none() {
    let ctx = require_database!();
    let service = CartService::new(&ctx.pool);

    let token = SessionToken::new(uuid::Uuid::new_v4().to_string());
    let guest = CartIdentity::Session(token.clone());
    let user_id = TestContext::fresh_user_id();

    let wreath = ctx.product(6500, 10, SizeCategory::Large).await;
    let garland = ctx.product(3500, 10, SizeCategory::Small).await;
    service.add_item(&guest, wreath.id, 2).await.expect("add");
    service.add_item(&guest, garland.id, 1).await.expect("add");

    service
        .merge_on_login(user_id, &token)
        .await
        .expect("merge");

    let user_lines = service
        .get(Some(&CartIdentity::User(user_id)))
        .await
        .expect("read user cart");
    assert_eq!(quantity_of(&user_lines, wreath.id), Some(2));
    assert_eq!(quantity_of(&user_lines, garland.id), Some(1));

    assert_eq!(guest_cart_rows(&ctx, &token).await, 0, "guest cart is gone");
}

#[tokio::test]
async fn test_merge_sums_quantities_into_existing_user_cart() {
    let ctx = require_database!();
    let service = CartService::new(&ctx.pool);

    let token = SessionToken::new(uuid::Uuid::new_v4().to_string());
    let guest = CartIdentity::Session(token.clone());
    let user_id = TestContext::fresh_user_id();
    let user = CartIdentity::User(user_id);

    let wreath = ctx.product(6500, 10, SizeCategory::Large).await;
    let garland = ctx.product(3500, 10, SizeCategory::Small).await;
    let posy = ctx.product(1500, 10, SizeCategory::Small).await;

    // User browsed logged in earlier; guest session built up overlap.
    service.add_item(&user, wreath.id, 2).await.expect("add");
    service.add_item(&user, posy.id, 1).await.expect("add");
    service.add_item(&guest, wreath.id, 3).await.expect("add");
    service.add_item(&guest, garland.id, 1).await.expect("add");

    service
        .merge_on_login(user_id, &token)
        .await
        .expect("merge");

    let user_lines = service.get(Some(&user)).await.expect("read user cart");
    assert_eq!(user_lines.len(), 3);
    assert_eq!(quantity_of(&user_lines, wreath.id), Some(5));
    assert_eq!(quantity_of(&user_lines, garland.id), Some(1));
    assert_eq!(quantity_of(&user_lines, posy.id), Some(1));

    assert_eq!(guest_cart_rows(&ctx, &token).await, 0, "guest cart is gone");
}

#[tokio::test]
async fn test_merge_without_guest_cart_is_a_noop() {
    let ctx = require_database!();
    let service = CartService::new(&ctx.pool);

    let token = SessionToken::new(uuid::Uuid::new_v4().to_string());
    let user_id = TestContext::fresh_user_id();
    let user = CartIdentity::User(user_id);

    let wreath = ctx.product(6500, 10, SizeCategory::Large).await;
    service.add_item(&user, wreath.id, 2).await.expect("add");

    // The guest session never added anything; a retried login request hits
    // the same path after the first merge deleted the guest cart.
    service
        .merge_on_login(user_id, &token)
        .await
        .expect("merge with no guest cart");
    service
        .merge_on_login(user_id, &token)
        .await
        .expect("repeated merge");

    let user_lines = service.get(Some(&user)).await.expect("read user cart");
    assert_eq!(quantity_of(&user_lines, wreath.id), Some(2));
}

#[tokio::test]
async fn test_concurrent_add_during_merge_is_not_lost() {
    let ctx = require_database!();
    let service = CartService::new(&ctx.pool);

    let token = SessionToken::new(uuid::Uuid::new_v4().to_string());
    let guest = CartIdentity::Session(token.clone());
    let user_id = TestContext::fresh_user_id();
    let user = CartIdentity::User(user_id);

    let wreath = ctx.product(6500, 20, SizeCategory::Large).await;
    service.add_item(&user, wreath.id, 1).await.expect("add");
    service.add_item(&guest, wreath.id, 2).await.expect("add");

    // Merge applies guest lines as quantity increments, so an add racing the
    // merge counts regardless of which transaction commits first.
    let (merged, added) = tokio::join!(
        service.merge_on_login(user_id, &token),
        service.add_item(&user, wreath.id, 4),
    );
    merged.expect("merge");
    added.expect("concurrent add");

    let user_lines = service.get(Some(&user)).await.expect("read user cart");
    assert_eq!(quantity_of(&user_lines, wreath.id), Some(7));
    assert_eq!(guest_cart_rows(&ctx, &token).await, 0, "guest cart is gone");
}

#[tokio::test]
async fn test_merge_is_idempotent_under_retry() {
    let ctx = require_database!();
    let service = CartService::new(&ctx.pool);

    let token = SessionToken::new(uuid::Uuid::new_v4().to_string());
    let guest = CartIdentity::Session(token.clone());
    let user_id = TestContext::fresh_user_id();
    let user = CartIdentity::User(user_id);

    let wreath = ctx.product(6500, 10, SizeCategory::Large).await;
    service.add_item(&user, wreath.id, 1).await.expect("add");
    service.add_item(&guest, wreath.id, 2).await.expect("add");

    service
        .merge_on_login(user_id, &token)
        .await
        .expect("merge");
    service
        .merge_on_login(user_id, &token)
        .await
        .expect("retried merge");

    // Quantities were summed exactly once.
    let user_lines = service.get(Some(&user)).await.expect("read user cart");
    assert_eq!(quantity_of(&user_lines, wreath.id), Some(3));
}
