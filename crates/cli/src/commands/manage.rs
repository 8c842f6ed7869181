//! `veda manage` - catalog management for admin accounts.
//!
//! All subcommands require a logged-in session whose profile carries the
//! admin role; the role is checked before any request is made.

use clap::Subcommand;
use rust_decimal::Decimal;

use veda_core::{CurrencyCode, Price, ProductId};
use veda_shop::api::ShopApi;
use veda_shop::api::types::{NewProduct, Product, ProductUpdate};
use veda_shop::persist::SnapshotStore;
use veda_shop::state::ShopState;

#[derive(Subcommand)]
pub enum ManageAction {
    /// Create a product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Price amount (in the shop currency)
        #[arg(short, long)]
        price: Option<Decimal>,

        /// Product description
        #[arg(short, long)]
        description: Option<String>,

        /// Product category
        #[arg(short, long)]
        category: Option<String>,

        /// Initial stock level
        #[arg(short, long)]
        stock: Option<u32>,
    },
    /// Update fields of an existing product
    Update {
        /// Product identifier
        product_id: ProductId,

        /// New product name
        #[arg(short, long)]
        name: Option<String>,

        /// New price amount
        #[arg(short, long)]
        price: Option<Decimal>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New stock level
        #[arg(short, long)]
        stock: Option<u32>,
    },
    /// Delete a product
    Delete {
        /// Product identifier
        product_id: ProductId,
    },
}

pub async fn run<A, S>(
    shop: &ShopState<A, S>,
    action: ManageAction,
) -> Result<(), veda_shop::ShopError>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    match action {
        ManageAction::Create {
            name,
            price,
            description,
            category,
            stock,
        } => {
            let input = NewProduct {
                name,
                description,
                price: price.map(|amount| Price::new(amount, CurrencyCode::default())),
                image_url: None,
                category,
                stock,
            };
            let product = shop.create_product(&input).await?;
            print_saved("created", &product);
        }
        ManageAction::Update {
            product_id,
            name,
            price,
            description,
            category,
            stock,
        } => {
            let update = ProductUpdate {
                name,
                description,
                price: price.map(|amount| Price::new(amount, CurrencyCode::default())),
                image_url: None,
                category,
                stock,
            };
            let product = shop.update_product(&product_id, &update).await?;
            print_saved("updated", &product);
        }
        ManageAction::Delete { product_id } => {
            shop.delete_product(&product_id).await?;
            print_deleted(&product_id);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_saved(verb: &str, product: &Product) {
    println!("{verb} {}  {}", product.id, product.name);
}

#[allow(clippy::print_stdout)]
fn print_deleted(product_id: &ProductId) {
    println!("deleted {product_id}");
}
