//! Veda CLI - shop client from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! veda catalog list
//! veda catalog show 7
//!
//! # Cart (guest state lives under VEDA_STORAGE_DIR)
//! veda cart add 7 --quantity 2
//! veda cart show
//!
//! # Account
//! veda auth login -e asha@example.com -p <password>
//! veda auth whoami
//! veda auth logout
//! ```
//!
//! # Commands
//!
//! - `catalog` - Browse products
//! - `cart` - Manage the cart
//! - `wishlist` - Manage the wishlist
//! - `auth` - Log in, register, inspect and end the session
//! - `manage` - Catalog management (admin accounts only)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::{Parser, Subcommand};

use veda_shop::api::ApiClient;
use veda_shop::config::ShopConfig;
use veda_shop::persist::FileStore;
use veda_shop::state::ShopState;

mod commands;

use commands::{auth, cart, catalog, manage, wishlist};

/// How long a mutating command waits before exit so detached sync tasks
/// can reach the server. Best effort, like the sync itself.
const SYNC_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "veda")]
#[command(author, version, about = "Veda shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: catalog::CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: wishlist::WishlistAction,
    },
    /// Log in, register, inspect and end the session
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Catalog management (admin accounts only)
    Manage {
        #[command(subcommand)]
        action: manage::ManageAction,
    },
}

impl Commands {
    /// Whether the command mutates a collection and so may have scheduled
    /// detached sync work.
    const fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Catalog { .. } | Self::Auth { .. } | Self::Manage { .. }
        )
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ShopConfig::from_env()?;
    let api = ApiClient::new(&config)?;
    let store = FileStore::new(&config.storage_dir);
    let mut shop = ShopState::new(api, store);

    // Pick up a previous session before anything else.
    shop.restore().await;

    let wait_for_sync = cli.command.is_mutation();

    match cli.command {
        Commands::Catalog { action } => catalog::run(&shop, action).await?,
        Commands::Cart { action } => cart::run(&mut shop, action).await?,
        Commands::Wishlist { action } => wishlist::run(&mut shop, action).await?,
        Commands::Auth { action } => auth::run(&mut shop, action).await?,
        Commands::Manage { action } => manage::run(&shop, action).await?,
    }

    if wait_for_sync && shop.identity().is_authenticated() {
        tokio::time::sleep(SYNC_GRACE).await;
    }
    Ok(())
}
