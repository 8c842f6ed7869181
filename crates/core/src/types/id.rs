//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Server identifiers
//! are opaque strings, so the wrappers hold `String`.
//!
//! [`ProductId`] is special: the remote API serves product identifiers as
//! either a JSON string or a JSON number depending on the endpoint, so it is
//! a dedicated two-variant type with canonical equality.

use core::fmt;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use veda_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("u-1");
/// let order_id = OrderId::new("u-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(OrderId);

/// A product identifier as served by the remote API.
///
/// The API is inconsistent about identifier types: some endpoints serve
/// numeric IDs, others the same IDs as strings. Two `ProductId`s are equal
/// when their canonical forms match, so `7` and `"7"` identify the same
/// product. `Hash` agrees with `PartialEq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier (e.g., a legacy auto-increment ID).
    Num(i64),
    /// String identifier (e.g., an object ID).
    Text(String),
}

impl ProductId {
    /// The canonical textual form used for equality and persistence keys.
    ///
    /// Numbers render as decimal; strings pass through unchanged. A string
    /// like `"07"` is NOT canonicalized to `"7"` - only exact decimal
    /// renderings of a number compare equal to it.
    #[must_use]
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            Self::Num(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::convert::Infallible;

    /// Parses user-typed input. Exact decimal renderings become numeric so
    /// they compare equal to API-served numbers; anything else (including
    /// `"07"`) stays textual.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Ok(Self::Num(n)),
            _ => Ok(Self::Text(s.to_owned())),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Num(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new("64af3c2e");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"64af3c2e\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_product_id_cross_type_equality() {
        assert_eq!(ProductId::from(7), ProductId::from("7"));
        assert_ne!(ProductId::from(7), ProductId::from("07"));
        assert_ne!(ProductId::from(7), ProductId::from("8"));
    }

    #[test]
    fn test_product_id_hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(ProductId::from(7));
        assert!(set.contains(&ProductId::from("7")));
        assert!(!set.contains(&ProductId::from("07")));
    }

    #[test]
    fn test_product_id_deserializes_both_wire_forms() {
        let numeric: ProductId = serde_json::from_str("7").unwrap();
        let textual: ProductId = serde_json::from_str("\"7\"").unwrap();
        assert!(matches!(numeric, ProductId::Num(7)));
        assert!(matches!(textual, ProductId::Text(ref s) if s == "7"));
        assert_eq!(numeric, textual);
    }

    #[test]
    fn test_product_id_from_str() {
        assert_eq!("7".parse::<ProductId>().unwrap(), ProductId::Num(7));
        assert_eq!(
            "07".parse::<ProductId>().unwrap(),
            ProductId::Text("07".to_owned())
        );
        assert_eq!(
            "sku-9".parse::<ProductId>().unwrap(),
            ProductId::Text("sku-9".to_owned())
        );
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::from(42).to_string(), "42");
        assert_eq!(ProductId::from("abc").to_string(), "abc");
    }
}
