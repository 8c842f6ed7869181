//! `veda cart` - manage the cart.
//!
//! Mutations apply locally and print the resulting cart immediately; the
//! server copy catches up in the background when logged in.

use clap::Subcommand;

use veda_core::ProductId;
use veda_shop::api::ShopApi;
use veda_shop::persist::SnapshotStore;
use veda_shop::state::ShopState;

use super::format_item;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product identifier
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart entry
    Update {
        /// Product identifier
        product_id: ProductId,

        /// New quantity (at least 1)
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product identifier
        product_id: ProductId,
    },
    /// Empty the cart
    Clear,
}

pub async fn run<A, S>(
    shop: &mut ShopState<A, S>,
    action: CartAction,
) -> Result<(), veda_shop::ShopError>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => {
            // The local snapshot wants the full product, not just the ID.
            let product = shop.product(&product_id).await?;
            shop.add_to_cart(product, quantity);
        }
        CartAction::Update {
            product_id,
            quantity,
        } => shop.update_cart_quantity(&product_id, quantity),
        CartAction::Remove { product_id } => shop.remove_from_cart(&product_id),
        CartAction::Clear => shop.clear_cart(),
    }

    print_cart(shop);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart<A, S>(shop: &ShopState<A, S>)
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    if shop.cart_items().is_empty() {
        println!("cart is empty");
        return;
    }
    for item in shop.cart_items() {
        println!("{}", format_item(item));
    }
}
