//! Background sync: mutations made while authenticated converge the
//! server copy; failures never disturb local state.

#![allow(clippy::unwrap_used)]

use veda_core::{ProductId, Role};
use veda_integration_tests::{FakeApi, product, settle};
use veda_shop::ShopState;
use veda_shop::persist::MemoryStore;

async fn logged_in_shop(api: &FakeApi) -> ShopState<FakeApi, MemoryStore> {
    api.seed_product(product(1, "Ashwagandha"));
    api.seed_product(product(2, "Triphala"));
    api.seed_account("Asha", "asha@example.com", "longenough", Role::Customer);

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    shop.login("asha@example.com", "longenough").await.unwrap();
    api.clear_calls();
    shop
}

#[tokio::test]
async fn test_authenticated_mutations_reach_the_server() {
    let api = FakeApi::new();
    let mut shop = logged_in_shop(&api).await;

    shop.add_to_cart(product(1, "Ashwagandha"), 2);
    settle().await;
    assert_eq!(api.calls(), vec!["add_cart_item 1 x2".to_owned()]);
    assert_eq!(api.remote_cart().len(), 1);

    // A repeated add pushes the resulting total, not the delta.
    shop.add_to_cart(product(1, "Ashwagandha"), 1);
    settle().await;
    assert!(api.calls().contains(&"update_cart_item 1 x3".to_owned()));

    shop.remove_from_cart(&ProductId::from(1));
    settle().await;
    assert!(api.remote_cart().is_empty());
}

#[tokio::test]
async fn test_clear_cart_retracts_each_item() {
    let api = FakeApi::new();
    let mut shop = logged_in_shop(&api).await;

    shop.add_to_cart(product(1, "Ashwagandha"), 1);
    shop.add_to_cart(product(2, "Triphala"), 1);
    settle().await;
    api.clear_calls();

    shop.clear_cart();
    settle().await;

    let mut calls = api.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "remove_cart_item 1".to_owned(),
            "remove_cart_item 2".to_owned(),
        ]
    );
    assert!(api.remote_cart().is_empty());
}

#[tokio::test]
async fn test_failed_sync_keeps_local_state() {
    let api = FakeApi::new();
    let mut shop = logged_in_shop(&api).await;
    api.set_mutations_fail(true);

    shop.add_to_cart(product(1, "Ashwagandha"), 2);
    settle().await;

    // The call was attempted, failed, and changed nothing remotely; the
    // local cart is untouched and there is no retry.
    assert_eq!(api.calls(), vec!["add_cart_item 1 x2".to_owned()]);
    assert!(api.remote_cart().is_empty());
    assert_eq!(shop.cart_quantity(&ProductId::from(1)), Some(2));

    settle().await;
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_wishlist_duplicate_add_is_silent() {
    let api = FakeApi::new();
    let mut shop = logged_in_shop(&api).await;

    shop.add_to_wishlist(product(1, "Ashwagandha"));
    settle().await;
    assert_eq!(api.calls(), vec!["add_wishlist_item 1".to_owned()]);

    // Second add is a local no-op and schedules nothing.
    shop.add_to_wishlist(product(1, "Ashwagandha"));
    settle().await;
    assert_eq!(api.calls().len(), 1);
    assert_eq!(shop.wishlist_items().len(), 1);
}

#[tokio::test]
async fn test_guest_mutations_schedule_nothing() {
    let api = FakeApi::new();
    api.seed_product(product(1, "Ashwagandha"));

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    shop.add_to_cart(product(1, "Ashwagandha"), 2);
    shop.add_to_wishlist(product(1, "Ashwagandha"));
    shop.clear_cart();
    settle().await;

    assert!(api.calls().is_empty());
    assert!(shop.is_in_wishlist(&ProductId::from(1)));
}
