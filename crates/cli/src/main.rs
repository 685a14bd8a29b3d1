//! Marquee CLI - cart and content tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a variant to the cart (creates the cart on first use)
//! marquee cart add gid://shopify/ProductVariant/4242 -q 2
//!
//! # Show the cart, then empty it
//! marquee cart show
//! marquee cart clear
//!
//! # Dump a CMS document
//! marquee content menu --locale fr
//! marquee content products-page --category vinyls --page 2
//!
//! # Browse the Shopify catalog
//! marquee products list --first 5
//! marquee products show kind-of-blue-lp
//! ```
//!
//! # Commands
//!
//! - `cart` - Drive the cart; the cart ID is kept in `<state-dir>/cart.json`
//!   unless `--no-persist` is given
//! - `content` - Fetch a Sanity document as JSON
//! - `products` - Query the Shopify catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marquee_storefront::cart::CartIdStore;

mod commands;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Marquee storefront CLI tools")]
struct Cli {
    /// Directory holding the persisted cart ID
    #[arg(long, global = true, env = "MARQUEE_STATE_DIR", default_value = ".marquee")]
    state_dir: PathBuf,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Do not read or write the persisted cart ID
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Fetch a CMS document
    Content {
        /// Document name (home, hub, shop, product, products, products-by-collection,
        /// products-page, product-with-translations, collections, menu, navigation,
        /// social-media, about, composition)
        document: String,

        /// Locale code (en, fr, zh, no, sv, ja, es)
        #[arg(short, long, default_value = "en")]
        locale: String,

        /// Product slug, for product documents
        #[arg(short, long)]
        slug: Option<String>,

        /// Category filter for products-page (`all` for none)
        #[arg(short, long)]
        category: Option<String>,

        /// 1-based page for products-page
        #[arg(short, long)]
        page: Option<u32>,

        /// Page size for products-page
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Query the Shopify catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show,
    /// Add a variant (GID or numeric ID)
    Add {
        variant_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Set the quantity of a line
    Update { line_id: String, quantity: i64 },
    /// Remove a line
    Remove { line_id: String },
    /// Remove every line
    Clear,
    /// Print the checkout URL
    Checkout,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List a page of products
    List {
        #[arg(long)]
        first: Option<i64>,

        /// Cursor from a previous page
        #[arg(long)]
        after: Option<String>,
    },
    /// Show one product by handle
    Show { handle: String },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let output = commands::Output { json: cli.json };

    match cli.command {
        Commands::Cart { action } => {
            if cli.no_persist {
                let cart = commands::cart::open_ephemeral()?;
                run_cart(&cart, action, output).await?;
            } else {
                let cart = commands::cart::open(&cli.state_dir).await?;
                run_cart(&cart, action, output).await?;
            }
        }
        Commands::Content {
            document,
            locale,
            slug,
            category,
            page,
            limit,
        } => {
            commands::content::fetch(
                &document,
                commands::content::Params {
                    locale,
                    slug,
                    category,
                    page,
                    limit,
                },
            )
            .await?;
        }
        Commands::Products { action } => match action {
            ProductsAction::List { first, after } => {
                commands::products::list(first, after, output).await?;
            }
            ProductsAction::Show { handle } => commands::products::show(&handle, output).await?,
        },
    }

    Ok(())
}

async fn run_cart<S: CartIdStore>(
    cart: &commands::cart::CliCart<S>,
    action: CartAction,
    output: commands::Output,
) -> Result<(), commands::CliError> {
    match action {
        CartAction::Show => commands::cart::show(cart, output)?,
        CartAction::Add {
            variant_id,
            quantity,
        } => commands::cart::add(cart, &variant_id, quantity, output).await?,
        CartAction::Update { line_id, quantity } => {
            commands::cart::update(cart, line_id, quantity, output).await?;
        }
        CartAction::Remove { line_id } => {
            commands::cart::remove(cart, line_id, output).await?;
        }
        CartAction::Clear => commands::cart::clear(cart, output).await?,
        CartAction::Checkout => commands::cart::checkout(cart)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "marquee",
            "--state-dir",
            "/tmp/m",
            "cart",
            "add",
            "4242",
            "-q",
            "3",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(cli.state_dir, PathBuf::from("/tmp/m"));
        assert!(!cli.no_persist);
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 3, .. }
            }
        ));
    }

    #[test]
    fn test_parse_no_persist_after_subcommand() {
        let cli = Cli::try_parse_from(["marquee", "cart", "checkout", "--no-persist"])
            .unwrap_or_else(|e| panic!("{e}"));

        assert!(cli.no_persist);
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Checkout
            }
        ));
    }
}
