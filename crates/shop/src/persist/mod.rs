//! Snapshot persistence: the browser-localStorage analog.
//!
//! Collections are mirrored to a synchronous key-value [`SnapshotStore`] on
//! every mutation, one JSON-serialized item array per `(kind, identity)`
//! pair. Writing a key replaces the previous snapshot; at most one snapshot
//! per pair exists at a time.
//!
//! # Key layout
//!
//! - `cart_guest`, `cart_<userId>` - cart snapshots
//! - `wishlist_guest`, `wishlist_<userId>` - wishlist snapshots
//! - `auth_token` - raw bearer token for session restore
//! - `auth_profile` - last-known user profile JSON (fast identity restore)

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;
use tracing::warn;

use crate::store::{CollectionKind, Item};

/// Keys for session state, next to the collection snapshots.
pub mod keys {
    /// Raw authentication token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Cached user profile JSON.
    pub const AUTH_PROFILE: &str = "auth_profile";

    /// Identity suffix used while no user is authenticated.
    pub const GUEST_SUFFIX: &str = "guest";
}

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed.
    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous per-origin key-value storage.
///
/// Implementations are expected to be small and fast; every collection
/// mutation writes through here on the caller's thread.
pub trait SnapshotStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Delete `key`. Deleting an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        (**self).remove(key)
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        (**self).remove(key)
    }
}

/// The snapshot key for a collection under a given identity suffix.
#[must_use]
pub fn snapshot_key(kind: CollectionKind, identity_suffix: &str) -> String {
    format!("{}_{identity_suffix}", kind.namespace())
}

/// Load a collection snapshot.
///
/// A missing key yields an empty list. A corrupt snapshot is treated as
/// absence: it is logged, the key is cleared, and an empty list is returned.
pub fn load_items(store: &impl SnapshotStore, key: &str) -> Vec<Item> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(key, %error, "failed to read snapshot; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(error) => {
            warn!(key, %error, "corrupt snapshot; clearing");
            if let Err(error) = store.remove(key) {
                warn!(key, %error, "failed to clear corrupt snapshot");
            }
            Vec::new()
        }
    }
}

/// Write a collection snapshot, replacing the previous one.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn save_items(
    store: &impl SnapshotStore,
    key: &str,
    items: &[Item],
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(items)?;
    store.put(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use veda_core::ProductId;

    use super::*;

    #[test]
    fn test_snapshot_key_layout() {
        assert_eq!(snapshot_key(CollectionKind::Cart, keys::GUEST_SUFFIX), "cart_guest");
        assert_eq!(snapshot_key(CollectionKind::Wishlist, "u-42"), "wishlist_u-42");
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        assert!(load_items(&store, "cart_guest").is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemoryStore::new();
        let items: Vec<Item> =
            serde_json::from_str(r#"[{"productId": 7, "quantity": 2}]"#).unwrap();

        save_items(&store, "cart_guest", &items).unwrap();
        let loaded = load_items(&store, "cart_guest");

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].identity(), Some(&ProductId::from(7)));
        assert_eq!(loaded[0].quantity, Some(2));
    }

    #[test]
    fn test_corrupt_snapshot_is_cleared() {
        let store = MemoryStore::new();
        store.put("cart_guest", "{not json").unwrap();

        assert!(load_items(&store, "cart_guest").is_empty());
        // The corrupt value is gone, not just ignored.
        assert!(store.get("cart_guest").unwrap().is_none());
    }
}
