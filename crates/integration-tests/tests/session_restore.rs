//! Session restore: picking up a persisted token on startup.

#![allow(clippy::unwrap_used)]

use veda_core::{ProductId, Role};
use veda_integration_tests::{FakeApi, product};
use veda_shop::ShopState;
use veda_shop::persist::{MemoryStore, SnapshotStore, keys};

fn seeded_api() -> FakeApi {
    let api = FakeApi::new();
    api.seed_product(product(1, "Ashwagandha"));
    api.seed_account("Asha", "asha@example.com", "longenough", Role::Customer);
    api
}

#[tokio::test]
async fn test_restore_uses_cached_profile() {
    let api = seeded_api();
    let store = MemoryStore::new();

    {
        let mut shop = ShopState::new(api.clone(), &store);
        shop.login("asha@example.com", "longenough").await.unwrap();
        shop.add_to_cart(product(1, "Ashwagandha"), 2);
        veda_integration_tests::settle().await;
    }
    api.clear_calls();

    // Fresh process over the same storage: identity and cart come back
    // without a profile fetch.
    let mut shop = ShopState::new(api.clone(), &store);
    let identity = shop.restore().await;
    assert!(identity.is_authenticated());
    assert_eq!(identity.user().unwrap().id.as_str(), "u-1");
    assert_eq!(shop.cart_quantity(&ProductId::from(1)), Some(2));
    assert!(!api.calls().contains(&"fetch_current_user".to_owned()));
}

#[tokio::test]
async fn test_restore_falls_back_to_profile_fetch() {
    let api = seeded_api();
    let store = MemoryStore::new();

    {
        let mut shop = ShopState::new(api.clone(), &store);
        shop.login("asha@example.com", "longenough").await.unwrap();
    }
    // Corrupt the cached profile; the token is still good.
    store.put(keys::AUTH_PROFILE, "{not json").unwrap();
    api.clear_calls();

    let mut shop = ShopState::new(api.clone(), &store);
    assert!(shop.restore().await.is_authenticated());
    assert!(api.calls().contains(&"fetch_current_user".to_owned()));

    // The re-fetched profile was cached again.
    let cached = store.get(keys::AUTH_PROFILE).unwrap().unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&cached).is_ok());
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let api = seeded_api();
    let store = MemoryStore::new();
    store.put(keys::AUTH_TOKEN, "tok-stale").unwrap();

    let mut shop = ShopState::new(api.clone(), &store);
    assert!(!shop.restore().await.is_authenticated());
    assert!(store.get(keys::AUTH_TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_persisted_session() {
    let api = seeded_api();
    let store = MemoryStore::new();

    let mut shop = ShopState::new(api.clone(), &store);
    shop.login("asha@example.com", "longenough").await.unwrap();
    assert!(store.get(keys::AUTH_TOKEN).unwrap().is_some());

    shop.logout();
    assert!(store.get(keys::AUTH_TOKEN).unwrap().is_none());
    assert!(store.get(keys::AUTH_PROFILE).unwrap().is_none());

    // A later restore finds nothing to pick up.
    assert!(!shop.restore().await.is_authenticated());
}
