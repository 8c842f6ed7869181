//! `veda wishlist` - manage the wishlist.

use clap::Subcommand;

use veda_core::ProductId;
use veda_shop::api::ShopApi;
use veda_shop::persist::SnapshotStore;
use veda_shop::state::ShopState;

use super::format_item;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add a product to the wishlist
    Add {
        /// Product identifier
        product_id: ProductId,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product identifier
        product_id: ProductId,
    },
}

pub async fn run<A, S>(
    shop: &mut ShopState<A, S>,
    action: WishlistAction,
) -> Result<(), veda_shop::ShopError>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    match action {
        WishlistAction::Show => {}
        WishlistAction::Add { product_id } => {
            let product = shop.product(&product_id).await?;
            shop.add_to_wishlist(product);
        }
        WishlistAction::Remove { product_id } => shop.remove_from_wishlist(&product_id),
    }

    print_wishlist(shop);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_wishlist<A, S>(shop: &ShopState<A, S>)
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    if shop.wishlist_items().is_empty() {
        println!("wishlist is empty");
        return;
    }
    for item in shop.wishlist_items() {
        println!("{}", format_item(item));
    }
}
