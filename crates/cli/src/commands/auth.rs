//! `veda auth` - session management.
//!
//! Login merges the local guest cart and wishlist into the account; the
//! session token is persisted so later invocations pick it up via restore.

use clap::Subcommand;

use veda_shop::api::ShopApi;
use veda_shop::api::types::UserProfile;
use veda_shop::persist::SnapshotStore;
use veda_shop::session::Identity;
use veda_shop::state::ShopState;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with an existing account
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account (and log it in)
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Show the current session
    Whoami,
    /// End the session and return to guest state
    Logout,
}

pub async fn run<A, S>(
    shop: &mut ShopState<A, S>,
    action: AuthAction,
) -> Result<(), veda_shop::ShopError>
where
    A: ShopApi + Clone + 'static,
    S: SnapshotStore,
{
    match action {
        AuthAction::Login { email, password } => {
            let user = shop.login(&email, &password).await?;
            print_logged_in(&user);
        }
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let user = shop.register(&name, &email, &password).await?;
            print_logged_in(&user);
        }
        AuthAction::Whoami => print_identity(shop.identity()),
        AuthAction::Logout => {
            shop.logout();
            print_identity(shop.identity());
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_logged_in(user: &UserProfile) {
    println!("logged in as {} <{}>", user.name, user.email);
}

#[allow(clippy::print_stdout)]
fn print_identity(identity: &Identity) {
    match identity.user() {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("guest"),
    }
}
