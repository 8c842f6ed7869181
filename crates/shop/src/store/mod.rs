//! In-memory cart and wishlist collections.
//!
//! A [`Collection`] is an ordered list of [`Item`]s, unique by product
//! identity. Cart and wishlist share the structure and differ only in the
//! repeated-add rule: a repeated cart add merges quantity, a repeated
//! wishlist add is a no-op.
//!
//! This module is pure state - persistence mirroring and remote sync live in
//! [`crate::state`].

use serde::{Deserialize, Serialize};

use veda_core::ProductId;

use crate::api::types::Product;

// =============================================================================
// Items
// =============================================================================

/// A single cart or wishlist entry.
///
/// Items created locally carry `product_id` plus a denormalized `product`
/// snapshot. Items handed back by the server are shaped less predictably:
/// the product identity may sit in `productId`, nested under `product.id`,
/// or directly in `id`, depending on which endpoint produced the item.
/// [`Item::identity`] resolves those three locations in that precedence
/// order; all lookups go through it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Cart only; wishlist items have no quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl Item {
    /// Create a cart item from a catalog product.
    #[must_use]
    pub fn cart(product: Product, quantity: u32) -> Self {
        Self {
            product_id: Some(product.id.clone()),
            id: None,
            product: Some(product),
            quantity: Some(quantity),
        }
    }

    /// Create a wishlist item from a catalog product.
    #[must_use]
    pub fn wishlist(product: Product) -> Self {
        Self {
            product_id: Some(product.id.clone()),
            id: None,
            product: Some(product),
            quantity: None,
        }
    }

    /// Resolve the product identity of this item.
    ///
    /// Checks `productId`, then `product.id`, then `id`. Returns `None` for
    /// items that carry no identity at all; such items are unmatchable and
    /// are ignored by lookups and merges.
    #[must_use]
    pub fn identity(&self) -> Option<&ProductId> {
        self.product_id
            .as_ref()
            .or_else(|| self.product.as_ref().map(|p| &p.id))
            .or(self.id.as_ref())
    }
}

/// Whether any item in `items` carries the given product identity.
pub(crate) fn slice_contains(items: &[Item], product_id: &ProductId) -> bool {
    items
        .iter()
        .any(|item| item.identity() == Some(product_id))
}

// =============================================================================
// Collections
// =============================================================================

/// Which collection an operation targets. Drives the merge rule and the
/// persistence key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Cart,
    Wishlist,
}

impl CollectionKind {
    /// Persistence key namespace (`cart_guest`, `wishlist_<userId>`, ...).
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

/// What an [`Collection::add`] actually did, so the caller knows which
/// remote call (if any) to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended with this quantity.
    Inserted(u32),
    /// An existing cart entry absorbed the add; this is the resulting total
    /// quantity, not the delta.
    Merged(u32),
    /// Wishlist already contained the product; nothing changed.
    AlreadyPresent,
}

/// An ordered collection of items, unique by product identity.
#[derive(Debug, Clone)]
pub struct Collection {
    kind: CollectionKind,
    items: Vec<Item>,
}

impl Collection {
    /// Create an empty collection.
    #[must_use]
    pub const fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Create a collection from already-loaded items.
    #[must_use]
    pub const fn from_items(kind: CollectionKind, items: Vec<Item>) -> Self {
        Self { kind, items }
    }

    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// The items in insertion order, for rendering.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the collection contains the given product.
    ///
    /// Tolerant of server-shaped items: identity may appear as `productId`,
    /// `product.id`, or `id` (checked in that order per item).
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        slice_contains(&self.items, product_id)
    }

    /// Current quantity for a cart entry, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.identity() == Some(product_id))
            .map(|item| item.quantity.unwrap_or(1))
    }

    /// Add a product.
    ///
    /// Cart: merges quantity into an existing entry, else appends. The
    /// requested quantity is floored at 1. Wishlist: idempotent append.
    pub fn add(&mut self, product: Product, quantity: u32) -> AddOutcome {
        let quantity = quantity.max(1);
        let existing = self
            .items
            .iter_mut()
            .find(|item| item.identity() == Some(&product.id));

        match (self.kind, existing) {
            (CollectionKind::Cart, Some(item)) => {
                let merged = item.quantity.unwrap_or(1).saturating_add(quantity);
                item.quantity = Some(merged);
                AddOutcome::Merged(merged)
            }
            (CollectionKind::Cart, None) => {
                self.items.push(Item::cart(product, quantity));
                AddOutcome::Inserted(quantity)
            }
            (CollectionKind::Wishlist, Some(_)) => AddOutcome::AlreadyPresent,
            (CollectionKind::Wishlist, None) => {
                self.items.push(Item::wishlist(product));
                AddOutcome::Inserted(1)
            }
        }
    }

    /// Remove a product. Idempotent: absent products are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| item.identity() != Some(product_id));
        self.items.len() != before
    }

    /// Overwrite the quantity of an existing cart entry.
    ///
    /// Quantities below 1 are rejected: removal is an explicit separate
    /// action, never an implicit side effect of a decrement. Returns whether
    /// the quantity changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self
            .items
            .iter_mut()
            .find(|item| item.identity() == Some(product_id))
        {
            Some(item) => {
                item.quantity = Some(quantity);
                true
            }
            None => false,
        }
    }

    /// Empty the collection, returning the items that were present.
    pub fn clear(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    /// Replace the contents wholesale (post-merge server adoption).
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("product-{id}"),
            description: None,
            price: None,
            image_url: None,
            category: None,
            stock: None,
        }
    }

    #[test]
    fn test_cart_repeated_add_merges_quantity() {
        let mut cart = Collection::new(CollectionKind::Cart);
        assert_eq!(cart.add(product(1), 1), AddOutcome::Inserted(1));
        assert_eq!(cart.add(product(1), 2), AddOutcome::Merged(3));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::from(1)), Some(3));
    }

    #[test]
    fn test_wishlist_repeated_add_is_noop() {
        let mut wishlist = Collection::new(CollectionKind::Wishlist);
        assert_eq!(wishlist.add(product(1), 1), AddOutcome::Inserted(1));
        assert_eq!(wishlist.add(product(1), 1), AddOutcome::AlreadyPresent);

        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.items()[0].quantity.is_none());
    }

    #[test]
    fn test_add_floors_quantity_at_one() {
        let mut cart = Collection::new(CollectionKind::Cart);
        cart.add(product(1), 0);
        assert_eq!(cart.quantity_of(&ProductId::from(1)), Some(1));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Collection::new(CollectionKind::Cart);
        cart.add(product(1), 1);

        assert!(cart.remove(&ProductId::from(1)));
        assert!(!cart.remove(&ProductId::from(1)));
        assert!(!cart.remove(&ProductId::from(99)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_floor() {
        let mut cart = Collection::new(CollectionKind::Cart);
        cart.add(product(1), 2);

        assert!(!cart.update_quantity(&ProductId::from(1), 0));
        assert_eq!(cart.quantity_of(&ProductId::from(1)), Some(2));

        assert!(cart.update_quantity(&ProductId::from(1), 5));
        assert_eq!(cart.quantity_of(&ProductId::from(1)), Some(5));
    }

    #[test]
    fn test_update_quantity_of_absent_item() {
        let mut cart = Collection::new(CollectionKind::Cart);
        assert!(!cart.update_quantity(&ProductId::from(1), 5));
    }

    #[test]
    fn test_clear_returns_previous_items() {
        let mut cart = Collection::new(CollectionKind::Cart);
        cart.add(product(1), 1);
        cart.add(product(2), 2);

        let removed = cart.clear();
        assert_eq!(removed.len(), 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lookup_precedence_across_item_shapes() {
        let seven = ProductId::from(7);

        let by_product_id: Item = serde_json::from_str(r#"{"productId": 7}"#).unwrap();
        let by_nested: Item = serde_json::from_str(r#"{"product": {"id": 7, "name": "x"}}"#).unwrap();
        let by_bare_id: Item = serde_json::from_str(r#"{"id": 7}"#).unwrap();

        for item in [by_product_id, by_nested, by_bare_id] {
            let collection = Collection::from_items(CollectionKind::Cart, vec![item]);
            assert!(collection.contains(&seven));
        }
    }

    #[test]
    fn test_identity_precedence_order() {
        // productId wins over product.id, which wins over id
        let item: Item = serde_json::from_str(
            r#"{"productId": 1, "product": {"id": 2, "name": "x"}, "id": 3}"#,
        )
        .unwrap();
        assert_eq!(item.identity(), Some(&ProductId::from(1)));

        let item: Item =
            serde_json::from_str(r#"{"product": {"id": 2, "name": "x"}, "id": 3}"#).unwrap();
        assert_eq!(item.identity(), Some(&ProductId::from(2)));
    }

    #[test]
    fn test_string_and_numeric_ids_match() {
        let mut cart = Collection::new(CollectionKind::Cart);
        cart.add(product(7), 1);
        assert!(cart.contains(&ProductId::from("7")));
    }

    #[test]
    fn test_identityless_items_are_ignored() {
        let item: Item = serde_json::from_str("{}").unwrap();
        assert!(item.identity().is_none());

        let collection = Collection::from_items(CollectionKind::Cart, vec![item]);
        assert!(!collection.contains(&ProductId::from(1)));
    }

    #[test]
    fn test_serialized_cart_item_shape() {
        let item = Item::cart(product(7), 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 7);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["product"]["name"], "product-7");
        assert!(json.get("id").is_none());
    }
}
