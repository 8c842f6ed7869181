//! Account flows: registration, credential validation, and the admin
//! gate on catalog management.

#![allow(clippy::unwrap_used)]

use veda_core::{ProductId, Role};
use veda_integration_tests::{FakeApi, product};
use veda_shop::ShopState;
use veda_shop::admin::CatalogError;
use veda_shop::api::types::{NewProduct, ProductUpdate};
use veda_shop::persist::MemoryStore;
use veda_shop::session::AuthError;

#[tokio::test]
async fn test_register_merges_guest_state() {
    let api = FakeApi::new();
    api.seed_product(product(1, "Ashwagandha"));

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    shop.add_to_cart(product(1, "Ashwagandha"), 2);

    let user = shop
        .register("Asha", "asha@example.com", "longenough")
        .await
        .unwrap();
    assert_eq!(user.role, Role::Customer);
    assert!(shop.identity().is_authenticated());
    assert_eq!(shop.cart_quantity(&ProductId::from(1)), Some(2));
    assert_eq!(api.remote_cart().len(), 1);
}

#[tokio::test]
async fn test_register_existing_email_fails() {
    let api = FakeApi::new();
    api.seed_account("Asha", "asha@example.com", "longenough", Role::Customer);

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    let error = shop
        .register("Asha", "asha@example.com", "longenough")
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::UserAlreadyExists));
    assert!(!shop.identity().is_authenticated());
}

#[tokio::test]
async fn test_invalid_fields_fail_before_the_network() {
    let api = FakeApi::new();
    let mut shop = ShopState::new(api.clone(), MemoryStore::new());

    let error = shop
        .register("Asha", "not-an-email", "longenough")
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::InvalidEmail(_)));

    let error = shop
        .register("Asha", "asha@example.com", "short")
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::WeakPassword));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_password_is_a_displayable_failure() {
    let api = FakeApi::new();
    api.seed_account("Asha", "asha@example.com", "longenough", Role::Customer);

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    let error = shop
        .login("asha@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Invalid email or password");
    assert!(!shop.identity().is_authenticated());
}

#[tokio::test]
async fn test_catalog_management_requires_admin() {
    let api = FakeApi::new();
    api.seed_account("Asha", "asha@example.com", "longenough", Role::Customer);

    let input = NewProduct {
        name: "Shatavari".to_owned(),
        description: None,
        price: None,
        image_url: None,
        category: None,
        stock: None,
    };

    // Guest: rejected before any request.
    let shop = ShopState::new(api.clone(), MemoryStore::new());
    assert!(matches!(
        shop.create_product(&input).await.unwrap_err(),
        CatalogError::NotAuthorized
    ));

    // Customer: still rejected client-side.
    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    shop.login("asha@example.com", "longenough").await.unwrap();
    assert!(matches!(
        shop.create_product(&input).await.unwrap_err(),
        CatalogError::NotAuthorized
    ));
    assert!(!api.calls().iter().any(|c| c.starts_with("create_product")));
}

#[tokio::test]
async fn test_admin_manages_the_catalog() {
    let api = FakeApi::new();
    api.seed_account("Meera", "meera@example.com", "longenough", Role::Admin);

    let mut shop = ShopState::new(api.clone(), MemoryStore::new());
    shop.login("meera@example.com", "longenough").await.unwrap();

    let created = shop
        .create_product(&NewProduct {
            name: "Shatavari".to_owned(),
            description: None,
            price: None,
            image_url: None,
            category: None,
            stock: Some(10),
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Shatavari");

    let updated = shop
        .update_product(
            &created.id,
            &ProductUpdate {
                stock: Some(4),
                ..ProductUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.stock, Some(4));
    assert_eq!(updated.name, "Shatavari");

    shop.delete_product(&created.id).await.unwrap();
    assert!(shop.products().await.unwrap().is_empty());
}
