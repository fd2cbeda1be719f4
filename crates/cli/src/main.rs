//! Catzo CLI - browse the catalog, manage the cart, and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! catzo products --category birds --search budgie
//!
//! # Manage the local cart
//! catzo cart add 3f2504e0-4f89-11d3-9a0c-0305e82c3301 --quantity 2
//! catzo cart set 3f2504e0-4f89-11d3-9a0c-0305e82c3301 5
//! catzo cart show
//!
//! # Place the order and list past orders
//! catzo checkout --user-id <uuid> --name "Asha" --phone 9876543210 \
//!     --email asha@example.com --address "12 Lake Road" --payment cod
//! catzo orders --user-id <uuid>
//! ```
//!
//! # Commands
//!
//! - `products` - List catalog products (Supabase)
//! - `cart` - Show or change the cart snapshot in `CATZO_DATA_DIR`
//! - `checkout` - Submit the cart as an order and email a confirmation
//! - `orders` - List a user's orders, newest first
//!
//! Logs go to stderr and honour `RUST_LOG` (default `catzo=info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use catzo_core::{Category, PaymentMethod, ProductId, UserId};
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::error::AppError;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "catzo")]
#[command(author, version, about = "Catzo pet shop storefront")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Only show this category (cats, birds, fish, food, equipment, cages)
        #[arg(short, long)]
        category: Option<Category>,

        /// Case-insensitive text to find in name or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Signed-in user's id
        #[arg(long)]
        user_id: UserId,

        /// Customer full name
        #[arg(long)]
        name: String,

        /// Ten-digit phone number
        #[arg(long)]
        phone: String,

        /// Customer email address
        #[arg(long)]
        email: String,

        /// Delivery address
        #[arg(long)]
        address: String,

        /// Payment method (cod, online, bank)
        #[arg(long, default_value = "cod")]
        payment: PaymentMethod,
    },
    /// List a user's orders
    Orders {
        /// Signed-in user's id
        #[arg(long)]
        user_id: UserId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print cart lines and totals
    Show,
    /// Add a catalog product to the cart
    Add {
        product_id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set a line's quantity (zero or less removes it)
    Set {
        product_id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            #[allow(clippy::print_stderr)]
            {
                eprintln!("error: {}", e.user_message());
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "catzo=info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Products { category, search } => {
            commands::products::list(&config, category, search).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&config, product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&config, product_id)?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&config, product_id, quantity)?,
            CartAction::Clear => commands::cart::clear(&config)?,
        },
        Commands::Checkout {
            user_id,
            name,
            phone,
            email,
            address,
            payment,
        } => {
            let form = catzo_storefront::checkout::CheckoutForm {
                customer_name: name,
                customer_phone: phone,
                customer_email: email,
                customer_address: address,
                payment_method: payment,
            };
            commands::checkout::place(&config, &form, user_id).await?;
        }
        Commands::Orders { user_id } => commands::orders::list(&config, user_id).await?,
    }
    Ok(())
}
