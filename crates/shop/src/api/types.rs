//! Wire types for the remote shop API.
//!
//! These are deliberately tolerant: the API omits fields freely, so
//! everything beyond an identifier and a name is optional.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veda_core::{Email, Price, ProductId, Role, UserId};

/// A catalog product as served by the API.
///
/// Cart and wishlist items carry a denormalized copy of this taken at the
/// time of add; it is never refreshed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Input for creating a product (admin only).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Partial update for a product (admin only). `None` fields are untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// An authenticated user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// Successful login/registration response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Raw bearer token; persisted as-is for session restore.
    pub token: String,
    pub user: UserProfile,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_tolerates_sparse_payloads() {
        let product: Product = serde_json::from_str(r#"{"id": 7, "name": "Ashwagandha"}"#).unwrap();
        assert_eq!(product.id, ProductId::from(7));
        assert!(product.price.is_none());
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_profile_defaults_role_to_customer() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": "u-1", "name": "Asha", "email": "asha@example.com"}"#,
        )
        .unwrap();
        assert_eq!(profile.role, Role::Customer);
        assert!(profile.created_at.is_none());
    }

    #[test]
    fn test_product_update_serializes_only_set_fields() {
        let update = ProductUpdate {
            stock: Some(12),
            ..ProductUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"stock":12}"#);
    }
}
