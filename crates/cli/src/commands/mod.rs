//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod manage;
pub mod wishlist;

use veda_shop::store::Item;

/// Render one collection entry as a single line.
#[must_use]
pub(crate) fn format_item(item: &Item) -> String {
    let id = item
        .identity()
        .map_or_else(|| "?".to_owned(), ToString::to_string);
    let name = item
        .product
        .as_ref()
        .map_or("(no snapshot)", |p| p.name.as_str());
    let price = item
        .product
        .as_ref()
        .and_then(|p| p.price)
        .map_or(String::new(), |p| format!("  {p}"));

    match item.quantity {
        Some(quantity) => format!("{id}  {name}  x{quantity}{price}"),
        None => format!("{id}  {name}{price}"),
    }
}
