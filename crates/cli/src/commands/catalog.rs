//! `veda catalog` - browse products.

use clap::Subcommand;

use veda_core::ProductId;
use veda_shop::api::ShopApi;
use veda_shop::api::types::Product;
use veda_shop::persist::SnapshotStore;
use veda_shop::state::ShopState;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List all products
    List,
    /// Show one product
    Show {
        /// Product identifier
        product_id: ProductId,
    },
}

pub async fn run<A, S>(
    shop: &ShopState<A, S>,
    action: CatalogAction,
) -> Result<(), veda_shop::ShopError>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    match action {
        CatalogAction::List => {
            let products = shop.products().await?;
            print_products(&products);
        }
        CatalogAction::Show { product_id } => {
            let product = shop.product(&product_id).await?;
            print_product(&product);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[Product]) {
    for product in products {
        let price = product
            .price
            .map_or(String::new(), |p| format!("  {p}"));
        println!("{}  {}{price}", product.id, product.name);
    }
    println!("{} product(s)", products.len());
}

#[allow(clippy::print_stdout)]
fn print_product(product: &Product) {
    println!("{}  {}", product.id, product.name);
    if let Some(price) = product.price {
        println!("  price: {price}");
    }
    if let Some(category) = &product.category {
        println!("  category: {category}");
    }
    if let Some(stock) = product.stock {
        println!("  stock: {stock}");
    }
    if let Some(description) = &product.description {
        println!("  {description}");
    }
}
