//! Integration test harness for the Veda shop client.
//!
//! Provides [`FakeApi`], an in-process stand-in for the remote shop API
//! with seedable server-side state, a call log, and failure toggles, so
//! the tests under `tests/` can drive full client flows (guest sessions,
//! merge-on-login, background sync, session restore) without a network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};

use veda_core::{Email, ProductId, Role, UserId};
use veda_shop::api::types::{
    Credentials, LoginResponse, NewProduct, Product, ProductUpdate, RegisterInput, UserProfile,
};
use veda_shop::api::{ApiError, CollectionFetch, ShopApi};
use veda_shop::store::Item;

/// Give detached sync tasks a chance to run.
///
/// The fake's futures are always immediately ready, so on the
/// current-thread test runtime a few yields are enough to drain them.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Build a catalog product with just an ID and a name.
#[must_use]
pub fn product(id: i64, name: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        description: None,
        price: None,
        image_url: None,
        category: None,
        stock: None,
    }
}

#[derive(Clone)]
struct Account {
    password: String,
    user: UserProfile,
}

#[derive(Default)]
struct FakeInner {
    products: Vec<Product>,
    cart: Vec<Item>,
    wishlist: Vec<Item>,
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, UserProfile>,
    presented_token: Option<String>,
    calls: Vec<String>,
    next_token: u32,
    collections_unreachable: bool,
    unrecognized_payload: bool,
    mutations_fail: bool,
}

/// In-process fake of the remote shop API.
///
/// Cheap to clone; all clones share the same server-side state.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    pub fn seed_product(&self, product: Product) {
        self.lock().products.push(product);
    }

    pub fn seed_account(&self, name: &str, email: &str, password: &str, role: Role) -> UserProfile {
        let mut inner = self.lock();
        let user = UserProfile {
            id: UserId::new(format!("u-{}", inner.accounts.len() + 1)),
            name: name.to_owned(),
            email: Email::parse(email).unwrap_or_else(|e| panic!("seed email {email}: {e}")),
            role,
            created_at: None,
        };
        inner.accounts.insert(
            email.to_owned(),
            Account {
                password: password.to_owned(),
                user: user.clone(),
            },
        );
        user
    }

    /// Put an item into the server-side cart directly.
    pub fn seed_remote_cart_item(&self, product_id: i64, quantity: u32) {
        let mut inner = self.lock();
        let snapshot = inner
            .products
            .iter()
            .find(|p| p.id == ProductId::from(product_id))
            .cloned();
        inner.cart.push(Item {
            product_id: Some(ProductId::from(product_id)),
            id: None,
            product: snapshot,
            quantity: Some(quantity),
        });
    }

    /// Put an item into the server-side wishlist directly.
    pub fn seed_remote_wishlist_item(&self, product_id: i64) {
        let mut inner = self.lock();
        let snapshot = inner
            .products
            .iter()
            .find(|p| p.id == ProductId::from(product_id))
            .cloned();
        inner.wishlist.push(Item {
            product_id: Some(ProductId::from(product_id)),
            id: None,
            product: snapshot,
            quantity: None,
        });
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    #[must_use]
    pub fn remote_cart(&self) -> Vec<Item> {
        self.lock().cart.clone()
    }

    #[must_use]
    pub fn remote_wishlist(&self) -> Vec<Item> {
        self.lock().wishlist.clone()
    }

    /// The calls made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    // =========================================================================
    // Failure toggles
    // =========================================================================

    /// Make collection endpoints fail with a 503.
    pub fn set_collections_unreachable(&self, unreachable: bool) {
        self.lock().collections_unreachable = unreachable;
    }

    /// Make collection endpoints answer 200 with a body that matches no
    /// known collection shape.
    pub fn set_unrecognized_payload(&self, unrecognized: bool) {
        self.lock().unrecognized_payload = unrecognized;
    }

    /// Make cart and wishlist mutations fail with a 500.
    pub fn set_mutations_fail(&self, fail: bool) {
        self.lock().mutations_fail = fail;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn record(&self, call: String) {
        self.lock().calls.push(call);
    }

    fn current_user(&self) -> Result<UserProfile, ApiError> {
        let inner = self.lock();
        inner
            .presented_token
            .as_ref()
            .and_then(|token| inner.sessions.get(token).cloned())
            .ok_or_else(|| ApiError::Unauthorized("invalid token".to_owned()))
    }

    fn issue_session(&self, user: &UserProfile) -> String {
        let mut inner = self.lock();
        inner.next_token += 1;
        let token = format!("tok-{}", inner.next_token);
        inner.sessions.insert(token.clone(), user.clone());
        token
    }

    fn fetch_collection(&self, wishlist: bool) -> CollectionFetch {
        let inner = self.lock();
        if inner.collections_unreachable {
            return Err(ApiError::Status {
                status: 503,
                message: "unavailable".to_owned(),
            });
        }
        if inner.unrecognized_payload {
            return Ok(None);
        }
        Ok(Some(if wishlist {
            inner.wishlist.clone()
        } else {
            inner.cart.clone()
        }))
    }

    fn check_mutations(&self) -> Result<(), ApiError> {
        if self.lock().mutations_fail {
            return Err(ApiError::Status {
                status: 500,
                message: "write failed".to_owned(),
            });
        }
        Ok(())
    }

    fn product_snapshot(inner: &FakeInner, product_id: &ProductId) -> Option<Product> {
        inner.products.iter().find(|p| &p.id == product_id).cloned()
    }
}

impl ShopApi for FakeApi {
    fn set_token(&self, token: Option<SecretString>) {
        self.lock().presented_token = token.map(|t| t.expose_secret().to_owned());
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record(format!("login {}", credentials.email));
        let account = self
            .lock()
            .accounts
            .get(credentials.email.as_str())
            .cloned();
        match account {
            Some(account) if account.password == credentials.password => {
                let token = self.issue_session(&account.user);
                Ok(LoginResponse {
                    token,
                    user: account.user,
                })
            }
            _ => Err(ApiError::Unauthorized(
                "Invalid email or password".to_owned(),
            )),
        }
    }

    async fn register(&self, input: &RegisterInput) -> Result<LoginResponse, ApiError> {
        self.record(format!("register {}", input.email));
        if self.lock().accounts.contains_key(input.email.as_str()) {
            return Err(ApiError::Status {
                status: 409,
                message: "email already registered".to_owned(),
            });
        }
        let user = self.seed_account(&input.name, input.email.as_str(), &input.password, Role::Customer);
        let token = self.issue_session(&user);
        Ok(LoginResponse { token, user })
    }

    async fn fetch_current_user(&self) -> Result<UserProfile, ApiError> {
        self.record("fetch_current_user".to_owned());
        self.current_user()
    }

    async fn fetch_cart(&self) -> CollectionFetch {
        self.record("fetch_cart".to_owned());
        self.current_user()?;
        self.fetch_collection(false)
    }

    async fn add_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        self.record(format!("add_cart_item {product_id} x{quantity}"));
        self.current_user()?;
        self.check_mutations()?;
        let mut inner = self.lock();
        if let Some(item) = inner
            .cart
            .iter_mut()
            .find(|item| item.identity() == Some(product_id))
        {
            // Server merges quantities like the client does.
            item.quantity = Some(item.quantity.unwrap_or(1).saturating_add(quantity));
            return Ok(());
        }
        let snapshot = Self::product_snapshot(&inner, product_id);
        inner.cart.push(Item {
            product_id: Some(product_id.clone()),
            id: None,
            product: snapshot,
            quantity: Some(quantity),
        });
        Ok(())
    }

    async fn update_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        self.record(format!("update_cart_item {product_id} x{quantity}"));
        self.current_user()?;
        self.check_mutations()?;
        let mut inner = self.lock();
        match inner
            .cart
            .iter_mut()
            .find(|item| item.identity() == Some(product_id))
        {
            Some(item) => {
                item.quantity = Some(quantity);
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("cart item {product_id}"))),
        }
    }

    async fn remove_cart_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.record(format!("remove_cart_item {product_id}"));
        self.current_user()?;
        self.check_mutations()?;
        self.lock()
            .cart
            .retain(|item| item.identity() != Some(product_id));
        Ok(())
    }

    async fn fetch_wishlist(&self) -> CollectionFetch {
        self.record("fetch_wishlist".to_owned());
        self.current_user()?;
        self.fetch_collection(true)
    }

    async fn add_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.record(format!("add_wishlist_item {product_id}"));
        self.current_user()?;
        self.check_mutations()?;
        let mut inner = self.lock();
        if inner
            .wishlist
            .iter()
            .any(|item| item.identity() == Some(product_id))
        {
            return Ok(());
        }
        let snapshot = Self::product_snapshot(&inner, product_id);
        inner.wishlist.push(Item {
            product_id: Some(product_id.clone()),
            id: None,
            product: snapshot,
            quantity: None,
        });
        Ok(())
    }

    async fn remove_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.record(format!("remove_wishlist_item {product_id}"));
        self.current_user()?;
        self.check_mutations()?;
        self.lock()
            .wishlist
            .retain(|item| item.identity() != Some(product_id));
        Ok(())
    }

    async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        self.record(format!("get_product {product_id}"));
        let inner = self.lock();
        Self::product_snapshot(&inner, product_id)
            .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))
    }

    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("get_products".to_owned());
        Ok(self.lock().products.clone())
    }

    async fn create_product(&self, input: &NewProduct) -> Result<Product, ApiError> {
        self.record(format!("create_product {}", input.name));
        let user = self.current_user()?;
        if !user.role.is_admin() {
            return Err(ApiError::Unauthorized("admin only".to_owned()));
        }
        let mut inner = self.lock();
        let product = Product {
            id: ProductId::from(i64::try_from(inner.products.len()).unwrap_or(0) + 1),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            image_url: input.image_url.clone(),
            category: input.category.clone(),
            stock: input.stock,
        };
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        product_id: &ProductId,
        input: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        self.record(format!("update_product {product_id}"));
        let user = self.current_user()?;
        if !user.role.is_admin() {
            return Err(ApiError::Unauthorized("admin only".to_owned()));
        }
        let mut inner = self.lock();
        let product = inner
            .products
            .iter_mut()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))?;
        if let Some(name) = &input.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &input.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = input.price {
            product.price = Some(price);
        }
        if let Some(image_url) = &input.image_url {
            product.image_url = Some(image_url.clone());
        }
        if let Some(category) = &input.category {
            product.category = Some(category.clone());
        }
        if let Some(stock) = input.stock {
            product.stock = Some(stock);
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.record(format!("delete_product {product_id}"));
        let user = self.current_user()?;
        if !user.role.is_admin() {
            return Err(ApiError::Unauthorized("admin only".to_owned()));
        }
        let mut inner = self.lock();
        let before = inner.products.len();
        inner.products.retain(|p| &p.id != product_id);
        if inner.products.len() == before {
            return Err(ApiError::NotFound(format!("product {product_id}")));
        }
        Ok(())
    }
}
