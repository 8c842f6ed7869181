//! Normalization for the API's inconsistent collection payloads.
//!
//! The remote API does not settle on one envelope for cart and wishlist
//! responses. Depending on the endpoint (and sometimes the code path behind
//! it) a collection arrives as any of:
//!
//! - a bare list: `[ ... ]`
//! - keyed by collection: `{"cart": [ ... ]}` / `{"wishlist": [ ... ]}`
//! - keyed generically: `{"items": [ ... ]}`
//! - doubly wrapped: `{"cart": {"items": [ ... ]}}`
//!
//! [`CollectionShape`] models the known variants explicitly and
//! [`normalize`] unwraps them. An unrecognized payload yields `None` ("no
//! usable list"); callers must leave their current state untouched in that
//! case rather than clobbering it with an empty collection.

use serde::Deserialize;
use serde_json::Value;

use crate::store::Item;

/// The known envelope variants for a collection response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CollectionShape {
    /// `[ ... ]`
    Bare(Vec<Item>),
    /// `{"cart": [ ... ]}` or `{"cart": {"items": [ ... ]}}`
    Cart { cart: Envelope },
    /// `{"wishlist": [ ... ]}` or `{"wishlist": {"items": [ ... ]}}`
    Wishlist { wishlist: Envelope },
    /// `{"items": [ ... ]}`
    Items { items: Vec<Item> },
}

/// The inner layer under a `cart`/`wishlist` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    List(Vec<Item>),
    Items { items: Vec<Item> },
}

impl CollectionShape {
    /// Unwrap to the item list.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Self::Bare(items) | Self::Items { items } => items,
            Self::Cart { cart: envelope } | Self::Wishlist { wishlist: envelope } => {
                match envelope {
                    Envelope::List(items) | Envelope::Items { items } => items,
                }
            }
        }
    }
}

/// Normalize a raw collection response body to an item list.
///
/// Returns `None` when the payload matches no known variant - including
/// `null`, bare scalars, and objects without a recognizable collection key.
#[must_use]
pub fn normalize(value: Value) -> Option<Vec<Item>> {
    serde_json::from_value::<CollectionShape>(value)
        .ok()
        .map(CollectionShape::into_items)
}
