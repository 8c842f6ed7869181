//! Application state shared with the UI layer.
//!
//! [`ShopState`] is the explicit state object every view talks to: it owns
//! the cart and wishlist for the current identity, mirrors them to the
//! snapshot store on every mutation, and schedules best-effort remote sync
//! when a user is authenticated.
//!
//! # Consistency model
//!
//! Local state is the source of truth for the UI. Mutations apply
//! synchronously and never fail from the caller's perspective; the remote
//! copy converges via detached background calls whose failures are logged
//! and swallowed. The one moment the server becomes the source of truth is
//! right after the merge-on-login sequence, when a successful re-fetch
//! replaces the in-memory collection wholesale.

use secrecy::SecretString;
use tracing::{debug, warn};

use veda_core::ProductId;

use crate::api::types::{Credentials, LoginResponse, Product, RegisterInput, UserProfile};
use crate::api::{ApiError, CollectionFetch, ShopApi};
use crate::persist::{self, SnapshotStore, keys};
use crate::session::{self, AuthError, Identity};
use crate::store::{AddOutcome, Collection, CollectionKind, Item, slice_contains};
use crate::sync;

/// The storefront state container.
///
/// Single-owner, single-threaded by design: mutations take `&mut self` and
/// run on the caller's thread. Only the detached sync tasks run elsewhere,
/// and they never touch this struct again.
pub struct ShopState<A, S> {
    api: A,
    store: S,
    identity: Identity,
    cart: Collection,
    wishlist: Collection,
}

impl<A, S> ShopState<A, S>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    /// Create a state container starting as Guest, loading the guest
    /// snapshots from `store`.
    pub fn new(api: A, store: S) -> Self {
        let mut state = Self {
            api,
            store,
            identity: Identity::Guest,
            cart: Collection::new(CollectionKind::Cart),
            wishlist: Collection::new(CollectionKind::Wishlist),
        };
        state.reload_collections();
        state
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The current identity.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Cart items in insertion order, for rendering.
    #[must_use]
    pub fn cart_items(&self) -> &[Item] {
        self.cart.items()
    }

    /// Wishlist items in insertion order, for rendering.
    #[must_use]
    pub fn wishlist_items(&self) -> &[Item] {
        self.wishlist.items()
    }

    /// Quantity of a cart entry, if present.
    #[must_use]
    pub fn cart_quantity(&self, product_id: &ProductId) -> Option<u32> {
        self.cart.quantity_of(product_id)
    }

    /// Whether the cart contains the product.
    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.cart.contains(product_id)
    }

    /// Whether the wishlist contains the product.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    pub(crate) const fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Propagates API failures; catalog reads have no local fallback.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.api.get_products().await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Propagates API failures; catalog reads have no local fallback.
    pub async fn product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        self.api.get_product(product_id).await
    }

    // =========================================================================
    // Cart mutations (optimistic, never fail)
    // =========================================================================

    /// Add a product to the cart, merging quantity into an existing entry.
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) {
        let product_id = product.id.clone();
        let outcome = self.cart.add(product, quantity);
        self.mirror(CollectionKind::Cart);

        if !self.identity.is_authenticated() {
            return;
        }
        let api = self.api.clone();
        match outcome {
            AddOutcome::Inserted(quantity) => {
                sync::spawn_remote("cart", "add", async move {
                    api.add_cart_item(&product_id, quantity).await
                });
            }
            // The server gets the resulting total, not the delta.
            AddOutcome::Merged(quantity) => {
                sync::spawn_remote("cart", "update", async move {
                    api.update_cart_item(&product_id, quantity).await
                });
            }
            AddOutcome::AlreadyPresent => {}
        }
    }

    /// Remove a product from the cart. Absent products are a no-op.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        if !self.cart.remove(product_id) {
            return;
        }
        self.mirror(CollectionKind::Cart);

        if self.identity.is_authenticated() {
            let api = self.api.clone();
            let product_id = product_id.clone();
            sync::spawn_remote("cart", "remove", async move {
                api.remove_cart_item(&product_id).await
            });
        }
    }

    /// Overwrite the quantity of a cart entry.
    ///
    /// Quantities below 1 are ignored - removal is its own action, never an
    /// implicit effect of a decrement.
    pub fn update_cart_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if !self.cart.update_quantity(product_id, quantity) {
            return;
        }
        self.mirror(CollectionKind::Cart);

        if self.identity.is_authenticated() {
            let api = self.api.clone();
            let product_id = product_id.clone();
            sync::spawn_remote("cart", "update", async move {
                api.update_cart_item(&product_id, quantity).await
            });
        }
    }

    /// Empty the cart.
    ///
    /// The API has no bulk-clear path; each previously-present item is
    /// retracted with its own background call.
    pub fn clear_cart(&mut self) {
        let removed = self.cart.clear();
        self.mirror(CollectionKind::Cart);

        if !self.identity.is_authenticated() {
            return;
        }
        for item in removed {
            let Some(product_id) = item.identity().cloned() else {
                continue;
            };
            let api = self.api.clone();
            sync::spawn_remote("cart", "remove", async move {
                api.remove_cart_item(&product_id).await
            });
        }
    }

    // =========================================================================
    // Wishlist mutations (optimistic, never fail)
    // =========================================================================

    /// Add a product to the wishlist. Idempotent.
    pub fn add_to_wishlist(&mut self, product: Product) {
        let product_id = product.id.clone();
        if self.wishlist.add(product, 1) == AddOutcome::AlreadyPresent {
            return;
        }
        self.mirror(CollectionKind::Wishlist);

        if self.identity.is_authenticated() {
            let api = self.api.clone();
            sync::spawn_remote("wishlist", "add", async move {
                api.add_wishlist_item(&product_id).await
            });
        }
    }

    /// Remove a product from the wishlist. Absent products are a no-op.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) {
        if !self.wishlist.remove(product_id) {
            return;
        }
        self.mirror(CollectionKind::Wishlist);

        if self.identity.is_authenticated() {
            let api = self.api.clone();
            let product_id = product_id.clone();
            sync::spawn_remote("wishlist", "remove", async move {
                api.remove_wishlist_item(&product_id).await
            });
        }
    }

    // =========================================================================
    // Session transitions
    // =========================================================================

    /// Log in and merge the guest collections into the server copy.
    ///
    /// On success the identity switches to the authenticated user, the
    /// token and profile are persisted for session restore, and each guest
    /// item missing from the server copy is offered to it; afterwards the
    /// server state is adopted if a re-fetch yields a usable list.
    ///
    /// # Errors
    ///
    /// Returns a structured failure with a user-displayable message when
    /// credentials are rejected; no collection state is touched on error.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = veda_core::Email::parse(email)?;
        let credentials = Credentials {
            email,
            password: password.to_owned(),
        };
        let response = self.api.login(&credentials).await.map_err(AuthError::from)?;
        Ok(self.complete_login(response).await)
    }

    /// Register a new account and log it in.
    ///
    /// Email shape and password length are validated before any network
    /// call.
    ///
    /// # Errors
    ///
    /// Returns a structured failure; no collection state is touched on
    /// error.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let email = session::validate_credentials(email, password)?;
        let input = RegisterInput {
            name: name.to_owned(),
            email,
            password: password.to_owned(),
        };
        let response = self.api.register(&input).await.map_err(AuthError::from)?;
        Ok(self.complete_login(response).await)
    }

    /// Restore a previous session from persisted state.
    ///
    /// Uses the cached profile to skip a network round trip; falls back to
    /// a profile fetch when the cache is absent or corrupt. Stays Guest on
    /// failure; the stored token is cleared only when the server rejects it.
    pub async fn restore(&mut self) -> &Identity {
        let token = match self.store.get(keys::AUTH_TOKEN) {
            Ok(Some(token)) => token,
            Ok(None) => return &self.identity,
            Err(error) => {
                warn!(%error, "failed to read stored token; staying guest");
                return &self.identity;
            }
        };
        self.api.set_token(Some(SecretString::from(token)));

        if let Some(user) = self.cached_profile() {
            self.identity = Identity::Authenticated(user);
            self.reload_collections();
            return &self.identity;
        }

        match self.api.fetch_current_user().await {
            Ok(user) => {
                self.cache_profile(&user);
                self.identity = Identity::Authenticated(user);
                self.reload_collections();
            }
            Err(error) => {
                warn!(%error, "session restore failed; staying guest");
                if matches!(error, ApiError::Unauthorized(_)) {
                    self.remove_key(keys::AUTH_TOKEN);
                }
                self.api.set_token(None);
            }
        }
        &self.identity
    }

    /// Log out: clear the persisted session and swap to the guest
    /// snapshots. In-flight background calls are not cancelled.
    pub fn logout(&mut self) {
        self.remove_key(keys::AUTH_TOKEN);
        self.remove_key(keys::AUTH_PROFILE);
        self.api.set_token(None);
        self.identity = Identity::Guest;
        self.reload_collections();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn complete_login(&mut self, response: LoginResponse) -> UserProfile {
        self.persist_session(&response);

        // Only guest state drives the merge; a login over a live session
        // behaves like logout-then-login, so the previous user's items are
        // never offered to the new account. The guest snapshot itself is
        // left in place for the next guest session.
        let (guest_cart, guest_wishlist) = if self.identity.is_authenticated() {
            (Vec::new(), Vec::new())
        } else {
            (self.cart.items().to_vec(), self.wishlist.items().to_vec())
        };

        let user = response.user.clone();
        self.api.set_token(Some(SecretString::from(response.token)));
        self.identity = Identity::Authenticated(response.user);
        self.reload_collections();

        self.merge_collection(CollectionKind::Cart, guest_cart).await;
        self.merge_collection(CollectionKind::Wishlist, guest_wishlist)
            .await;

        user
    }

    /// Merge-on-login for one collection.
    ///
    /// Best effort throughout: a failed fetch merges against an empty list
    /// (the server tolerates re-adding an existing item), failed per-item
    /// adds are dropped silently, and the server copy only replaces local
    /// state when the re-fetch yields a usable list.
    async fn merge_collection(&mut self, kind: CollectionKind, guest_items: Vec<Item>) {
        let collection = kind.namespace();

        let remote_items = match self.fetch_remote(kind).await {
            Ok(Some(items)) => items,
            Ok(None) => {
                debug!(collection, "remote returned no usable list; merging against empty");
                Vec::new()
            }
            Err(error) => {
                warn!(collection, %error, "failed to fetch remote collection; merging against empty");
                Vec::new()
            }
        };

        for item in &guest_items {
            let Some(product_id) = item.identity() else {
                continue;
            };
            if slice_contains(&remote_items, product_id) {
                continue;
            }
            let result = match kind {
                CollectionKind::Cart => {
                    self.api
                        .add_cart_item(product_id, item.quantity.unwrap_or(1))
                        .await
                }
                CollectionKind::Wishlist => self.api.add_wishlist_item(product_id).await,
            };
            if let Err(error) = result {
                // Most commonly "already exists"; the server copy wins.
                debug!(collection, %product_id, %error, "merge add skipped");
            }
        }

        match self.fetch_remote(kind).await {
            Ok(Some(items)) => {
                self.collection_mut(kind).replace(items);
                self.mirror(kind);
            }
            Ok(None) => {
                debug!(collection, "post-merge fetch returned no usable list; keeping local snapshot");
            }
            Err(error) => {
                warn!(collection, %error, "post-merge fetch failed; keeping local snapshot");
            }
        }
    }

    async fn fetch_remote(&self, kind: CollectionKind) -> CollectionFetch {
        match kind {
            CollectionKind::Cart => self.api.fetch_cart().await,
            CollectionKind::Wishlist => self.api.fetch_wishlist().await,
        }
    }

    const fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Cart => &self.cart,
            CollectionKind::Wishlist => &self.wishlist,
        }
    }

    const fn collection_mut(&mut self, kind: CollectionKind) -> &mut Collection {
        match kind {
            CollectionKind::Cart => &mut self.cart,
            CollectionKind::Wishlist => &mut self.wishlist,
        }
    }

    /// Re-key both collections to the current identity and load their
    /// snapshots, discarding whatever was in memory.
    fn reload_collections(&mut self) {
        let suffix = self.identity.storage_suffix().to_owned();
        for kind in [CollectionKind::Cart, CollectionKind::Wishlist] {
            let key = persist::snapshot_key(kind, &suffix);
            let items = persist::load_items(&self.store, &key);
            *self.collection_mut(kind) = Collection::from_items(kind, items);
        }
    }

    /// Write the current in-memory collection over its persisted snapshot.
    fn mirror(&self, kind: CollectionKind) {
        let key = persist::snapshot_key(kind, self.identity.storage_suffix());
        if let Err(error) = persist::save_items(&self.store, &key, self.collection(kind).items()) {
            warn!(key, %error, "failed to mirror snapshot");
        }
    }

    fn persist_session(&self, response: &LoginResponse) {
        if let Err(error) = self.store.put(keys::AUTH_TOKEN, &response.token) {
            warn!(%error, "failed to persist auth token");
        }
        self.cache_profile(&response.user);
    }

    fn cache_profile(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(error) = self.store.put(keys::AUTH_PROFILE, &raw) {
                    warn!(%error, "failed to cache user profile");
                }
            }
            Err(error) => warn!(%error, "failed to serialize user profile"),
        }
    }

    fn cached_profile(&self) -> Option<UserProfile> {
        let raw = self.store.get(keys::AUTH_PROFILE).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(%error, "corrupt cached profile; clearing");
                self.remove_key(keys::AUTH_PROFILE);
                None
            }
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(error) = self.store.remove(key) {
            warn!(key, %error, "failed to clear persisted key");
        }
    }
}
